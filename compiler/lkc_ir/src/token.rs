//! Token-kind registry.
//!
//! A token kind is a lexical category produced by the lexer. Kinds that
//! always match the same text (keywords, punctuation) carry that text as
//! their literal surface form; kinds like identifiers do not, and every
//! grammar token match on them must supply explicit match text.

use rustc_hash::FxHashMap;

use crate::TokenKindId;

/// A lexical category.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenKindDef {
    /// Kind name, as declared in the lexer.
    pub name: String,
    /// Fixed surface form, when the kind matches a literal.
    pub literal: Option<String>,
}

/// Registry of token kinds, in declaration order.
///
/// Index 0 is reserved for the termination token emitted at end of input.
#[derive(Clone, Debug)]
pub struct TokenKinds {
    kinds: Vec<TokenKindDef>,
    by_name: FxHashMap<String, TokenKindId>,
}

impl TokenKindId {
    /// End-of-input token.
    pub const TERMINATION: TokenKindId = TokenKindId::new(0);
}

impl Default for TokenKinds {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenKinds {
    /// Create a registry holding only the termination kind.
    pub fn new() -> Self {
        let mut kinds = TokenKinds {
            kinds: Vec::new(),
            by_name: FxHashMap::default(),
        };
        kinds.push("Termination", None);
        kinds
    }

    fn push(&mut self, name: &str, literal: Option<&str>) -> TokenKindId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = TokenKindId::from_len(self.kinds.len());
        self.kinds.push(TokenKindDef {
            name: name.to_owned(),
            literal: literal.map(str::to_owned),
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Declare a kind that always matches `literal`.
    ///
    /// Declaring an existing name returns the existing kind unchanged.
    pub fn literal(&mut self, name: &str, literal: &str) -> TokenKindId {
        self.push(name, Some(literal))
    }

    /// Declare a kind whose text varies (identifiers, numbers, ...).
    pub fn pattern(&mut self, name: &str) -> TokenKindId {
        self.push(name, None)
    }

    #[inline]
    pub fn get(&self, id: TokenKindId) -> &TokenKindDef {
        &self.kinds[id.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<TokenKindId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn name(&self, id: TokenKindId) -> &str {
        &self.get(id).name
    }

    #[inline]
    pub fn literal_text(&self, id: TokenKindId) -> Option<&str> {
        self.get(id).literal.as_deref()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenKindId, &TokenKindDef)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, def)| (TokenKindId::from_len(i), def))
    }
}
