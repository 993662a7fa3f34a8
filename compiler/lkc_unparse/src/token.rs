//! Token unparsers and token sequences.
//!
//! A [`TokenUnparser`] is identified by its `(kind, match text)` pair and
//! interned in the session's [`TokenTable`], so the generated tables hold
//! each distinct token once. Two token unparsers are *equivalent* when they
//! render to the same text, even if their identities differ.

use lkc_ir::{Grammar, ParserId, ParserKind, TokenKindId, TokenKinds};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::UnparseProblem;

/// Index of a [`TokenUnparser`] in a [`TokenTable`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct TokenUnparserId(u32);

impl TokenUnparserId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    fn from_len(len: usize) -> Self {
        TokenUnparserId(u32::try_from(len).unwrap_or(u32::MAX))
    }
}

/// Unparser for one token whose text is statically known.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenUnparser {
    pub kind: TokenKindId,
    /// Text for kinds without a literal surface form.
    pub match_text: Option<String>,
    text: String,
}

impl TokenUnparser {
    /// Text emitted when unparsing this token.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Per-session cache of token unparsers, keyed by token identity.
#[derive(Clone, Debug, Default)]
pub struct TokenTable {
    unparsers: Vec<TokenUnparser>,
    by_key: FxHashMap<(TokenKindId, Option<String>), TokenUnparserId>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the unparser for `(kind, match_text)`, creating it on first use.
    ///
    /// An empty match text counts as no match text. Exactly one of the kind's
    /// literal and `match_text` must be present.
    pub fn intern(
        &mut self,
        tokens: &TokenKinds,
        kind: TokenKindId,
        match_text: Option<&str>,
    ) -> Result<TokenUnparserId, UnparseProblem> {
        let match_text = match_text.filter(|text| !text.is_empty());
        let key = (kind, match_text.map(str::to_owned));
        if let Some(&id) = self.by_key.get(&key) {
            return Ok(id);
        }

        let text = match (tokens.literal_text(kind), match_text) {
            (Some(literal), None) => literal.to_owned(),
            (None, Some(text)) => text.to_owned(),
            (Some(_), Some(_)) => {
                return Err(UnparseProblem::internal(format!(
                    "token {} has a literal and cannot take match text",
                    tokens.name(kind)
                )))
            }
            (None, None) => {
                return Err(UnparseProblem::internal(format!(
                    "token {} has no literal, match text is required",
                    tokens.name(kind)
                )))
            }
        };

        let id = TokenUnparserId::from_len(self.unparsers.len());
        self.unparsers.push(TokenUnparser {
            kind,
            match_text: key.1.clone(),
            text,
        });
        self.by_key.insert(key, id);
        Ok(id)
    }

    /// Token unparser for `parser`, which must be a token match.
    pub fn from_parser(
        &mut self,
        grammar: &Grammar,
        parser: ParserId,
    ) -> Result<TokenUnparserId, UnparseProblem> {
        match grammar.kind(parser) {
            ParserKind::Token { kind, match_text } => {
                self.intern(&grammar.tokens, *kind, match_text.as_deref())
            }
            _ => Err(UnparseProblem::internal(format!(
                "token parser expected, got {}",
                grammar.describe(parser)
            ))),
        }
    }

    #[inline]
    pub fn get(&self, id: TokenUnparserId) -> &TokenUnparser {
        &self.unparsers[id.index()]
    }

    #[inline]
    pub fn text(&self, id: TokenUnparserId) -> &str {
        self.get(id).text()
    }

    /// Whether two optional tokens are equivalent. An absent token is only
    /// equivalent to another absent token.
    pub fn equivalent(&self, a: Option<TokenUnparserId>, b: Option<TokenUnparserId>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.text(a) == self.text(b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Rendering of an optional token, `<none>` when absent.
    pub fn text_or_none(&self, token: Option<TokenUnparserId>) -> &str {
        token.map_or("<none>", |id| self.text(id))
    }

    /// Every interned token, ordered by rendered text, then identity.
    pub fn sorted(&self) -> Vec<TokenUnparserId> {
        let mut ids: Vec<_> = self.ids().collect();
        ids.sort_by(|&a, &b| {
            let (a, b) = (self.get(a), self.get(b));
            (a.text(), a.kind, &a.match_text).cmp(&(b.text(), b.kind, &b.match_text))
        });
        ids
    }

    pub fn ids(&self) -> impl Iterator<Item = TokenUnparserId> {
        (0..self.unparsers.len()).map(TokenUnparserId::from_len)
    }

    pub fn len(&self) -> usize {
        self.unparsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unparsers.is_empty()
    }
}

/// Ordered run of token unparsers.
///
/// Equality is identity of the referenced unparsers; use
/// [`TokenSequence::equivalent`] to compare renderings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenSequence {
    tokens: SmallVec<[TokenUnparserId; 4]>,
}

impl TokenSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: TokenUnparserId) {
        self.tokens.push(token);
    }

    /// New sequence holding `self`'s tokens followed by `other`'s.
    #[must_use]
    pub fn concat(&self, other: &TokenSequence) -> TokenSequence {
        let mut tokens = self.tokens.clone();
        tokens.extend_from_slice(&other.tokens);
        TokenSequence { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[TokenUnparserId] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenUnparserId> + '_ {
        self.tokens.iter().copied()
    }

    /// Same length and pairwise equivalent tokens.
    pub fn equivalent(&self, other: &TokenSequence, table: &TokenTable) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| table.equivalent(Some(a), Some(b)))
    }

    /// Fail with a diagnostic naming `role` unless the sequences are
    /// equivalent.
    pub fn check_equivalence(
        &self,
        role: &str,
        other: &TokenSequence,
        table: &TokenTable,
    ) -> Result<(), UnparseProblem> {
        if self.equivalent(other, table) {
            return Ok(());
        }
        Err(UnparseProblem::InconsistentTokens {
            role: role.to_owned(),
            left: self.render(table),
            right: other.render(table),
        })
    }

    /// Token texts joined by single spaces.
    pub fn render(&self, table: &TokenTable) -> String {
        let mut out = String::new();
        for (i, token) in self.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(table.text(token));
        }
        out
    }
}

impl FromIterator<TokenUnparserId> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = TokenUnparserId>>(iter: I) -> Self {
        TokenSequence {
            tokens: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
