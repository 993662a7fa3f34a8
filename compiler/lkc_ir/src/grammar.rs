//! Grammar arena: parser combinators and named rules.
//!
//! A grammar is a flat arena of [`Parser`]s addressed by [`ParserId`], plus
//! a list of named [`Rule`]s whose roots are parsers in that arena. Deferred
//! references point at rules, which is how recursive grammars are expressed
//! without cyclic ownership.
//!
//! # Combinator kinds
//!
//! | Kind        | Produces                                     |
//! |-------------|----------------------------------------------|
//! | `Row`       | a sequence of sub-results                    |
//! | `Transform` | a node built from a row, one result per field|
//! | `Extract`   | one element of a row, the rest is dropped    |
//! | `List`      | a list node                                  |
//! | `Opt`       | the inner result or nothing (or an enum node)|
//! | `Or`        | the first matching branch                    |
//! | `Defer`     | whatever the referenced rule produces        |
//! | `Token`     | a token                                      |
//! | `Null`      | an absent node, consuming nothing            |
//! | `Predicate` | the inner result, if it passes a check       |
//! | `Skip`      | an error node fabricated during recovery     |
//! | `NoBacktrack` | nothing; cuts backtracking                 |
//! | `DontSkip`  | the inner result; limits error recovery      |

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use crate::stack::ensure_sufficient_stack;
use crate::{NodeFlags, NodeTypeId, NodeTypes, ParserId, RuleId, Span, TokenKindId, TokenKinds};

/// The enum node pair created by a boolean optional.
///
/// When the wrapped parser succeeds the `present` alternative is built,
/// otherwise the `absent` one, without consuming tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolAlternatives {
    /// Abstract enum node both alternatives derive from.
    pub base: NodeTypeId,
    pub present: NodeTypeId,
    pub absent: NodeTypeId,
}

impl BoolAlternatives {
    /// Declare `name` with its `Present` and `Absent` alternatives.
    pub fn declare(nodes: &mut NodeTypes, name: &str) -> Self {
        let base = nodes.declare(name, None, NodeFlags::ABSTRACT);
        let present = nodes.declare(&format!("{name}.Present"), Some(base), NodeFlags::empty());
        let absent = nodes.declare(&format!("{name}.Absent"), Some(base), NodeFlags::empty());
        BoolAlternatives {
            base,
            present,
            absent,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeTypeId> {
        [self.present, self.absent].into_iter()
    }
}

/// Kind-specific data of a combinator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ParserKind {
    Row(Vec<ParserId>),
    Transform {
        node: NodeTypeId,
        /// Always a `Row`.
        row: ParserId,
    },
    Extract {
        /// Always a `Row`.
        row: ParserId,
        index: usize,
    },
    List {
        node: NodeTypeId,
        element: ParserId,
        /// A `Token` parser, or `None` when no separator is allowed.
        separator: Option<ParserId>,
    },
    Opt {
        inner: ParserId,
        alternatives: Option<BoolAlternatives>,
        /// Error-tolerant optional: a missing match is reported but parsing
        /// continues as if it were there.
        is_error: bool,
    },
    Or(Vec<ParserId>),
    Defer(RuleId),
    Token {
        kind: TokenKindId,
        /// Required when `kind` has no literal, forbidden otherwise.
        match_text: Option<String>,
    },
    Null(NodeTypeId),
    Predicate {
        inner: ParserId,
        property: String,
    },
    Skip(NodeTypeId),
    NoBacktrack,
    DontSkip(ParserId),
}

impl ParserKind {
    /// Short kind name, for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::Row(_) => "Row",
            ParserKind::Transform { .. } => "Transform",
            ParserKind::Extract { .. } => "Pick",
            ParserKind::List { .. } => "List",
            ParserKind::Opt { .. } => "Opt",
            ParserKind::Or(_) => "Or",
            ParserKind::Defer(_) => "Defer",
            ParserKind::Token { .. } => "Token",
            ParserKind::Null(_) => "Null",
            ParserKind::Predicate { .. } => "Predicate",
            ParserKind::Skip(_) => "Skip",
            ParserKind::NoBacktrack => "NoBacktrack",
            ParserKind::DontSkip(_) => "DontSkip",
        }
    }
}

/// A combinator in the grammar arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Parser {
    pub kind: ParserKind,
    pub span: Span,
}

/// A named grammar rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub name: String,
    /// `ParserId::INVALID` until the rule is defined.
    pub root: ParserId,
    /// Synthesized for a `DontSkip` wrapper rather than written by the user.
    pub dont_skip: bool,
}

/// What a parser yields, as far as unparsing is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParserType {
    Node(NodeTypeId),
    Token,
    /// Rows, markers, and alternations with no common node type.
    Nothing,
}

impl ParserType {
    pub fn node(self) -> Option<NodeTypeId> {
        match self {
            ParserType::Node(node) => Some(node),
            ParserType::Token | ParserType::Nothing => None,
        }
    }
}

/// Parser arena, rules, and the registries they refer to.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    pub nodes: NodeTypes,
    pub tokens: TokenKinds,
    parsers: Vec<Parser>,
    rules: Vec<Rule>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already populated registries.
    pub fn with_registries(nodes: NodeTypes, tokens: TokenKinds) -> Self {
        Grammar {
            nodes,
            tokens,
            parsers: Vec::new(),
            rules: Vec::new(),
        }
    }

    // Arena access

    #[inline]
    pub fn parser(&self, id: ParserId) -> &Parser {
        &self.parsers[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ParserId) -> &ParserKind {
        &self.parser(id).kind
    }

    #[inline]
    pub fn span(&self, id: ParserId) -> Span {
        self.parser(id).span
    }

    pub fn set_span(&mut self, id: ParserId, span: Span) {
        self.parsers[id.index()].span = span;
    }

    pub fn parser_count(&self) -> usize {
        self.parsers.len()
    }

    #[inline]
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::from_len(i), rule))
    }

    pub fn lookup_rule(&self, name: &str) -> Option<RuleId> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .map(RuleId::from_len)
    }

    // Rules

    /// Declare a rule whose root is provided later by [`Grammar::define_rule`].
    pub fn declare_rule(&mut self, name: &str) -> RuleId {
        let id = RuleId::from_len(self.rules.len());
        self.rules.push(Rule {
            name: name.to_owned(),
            root: ParserId::INVALID,
            dont_skip: false,
        });
        id
    }

    pub fn define_rule(&mut self, rule: RuleId, root: ParserId) {
        self.rules[rule.index()].root = root;
    }

    pub fn add_rule(&mut self, name: &str, root: ParserId) -> RuleId {
        let id = self.declare_rule(name);
        self.define_rule(id, root);
        id
    }

    /// Add a rule synthesized for a `DontSkip` wrapper.
    pub fn add_dont_skip_rule(&mut self, name: &str, root: ParserId) -> RuleId {
        let id = self.add_rule(name, root);
        self.rules[id.index()].dont_skip = true;
        id
    }

    /// Root parser of a deferred reference, if its rule is defined.
    pub fn resolve(&self, rule: RuleId) -> Option<ParserId> {
        let root = self.rule(rule).root;
        root.is_valid().then_some(root)
    }

    // Builders

    fn push(&mut self, kind: ParserKind) -> ParserId {
        let id = ParserId::from_len(self.parsers.len());
        self.parsers.push(Parser {
            kind,
            span: Span::DUMMY,
        });
        id
    }

    pub fn row(&mut self, parsers: impl IntoIterator<Item = ParserId>) -> ParserId {
        self.push(ParserKind::Row(parsers.into_iter().collect()))
    }

    /// Build `node` from a row of sub-parsers.
    pub fn transform(&mut self, node: NodeTypeId, parsers: impl IntoIterator<Item = ParserId>) -> ParserId {
        let row = self.row(parsers);
        self.push(ParserKind::Transform { node, row })
    }

    /// Keep element `index` of a row, dropping the others.
    pub fn pick(&mut self, parsers: impl IntoIterator<Item = ParserId>, index: usize) -> ParserId {
        let row = self.row(parsers);
        self.push(ParserKind::Extract { row, index })
    }

    pub fn list(&mut self, node: NodeTypeId, element: ParserId, separator: Option<ParserId>) -> ParserId {
        self.push(ParserKind::List {
            node,
            element,
            separator,
        })
    }

    pub fn opt(&mut self, inner: ParserId) -> ParserId {
        self.push(ParserKind::Opt {
            inner,
            alternatives: None,
            is_error: false,
        })
    }

    pub fn opt_error(&mut self, inner: ParserId) -> ParserId {
        self.push(ParserKind::Opt {
            inner,
            alternatives: None,
            is_error: true,
        })
    }

    pub fn opt_bool(&mut self, inner: ParserId, alternatives: BoolAlternatives) -> ParserId {
        self.push(ParserKind::Opt {
            inner,
            alternatives: Some(alternatives),
            is_error: false,
        })
    }

    pub fn or(&mut self, branches: impl IntoIterator<Item = ParserId>) -> ParserId {
        self.push(ParserKind::Or(branches.into_iter().collect()))
    }

    pub fn defer(&mut self, rule: RuleId) -> ParserId {
        self.push(ParserKind::Defer(rule))
    }

    /// Match a token of a literal kind.
    pub fn token(&mut self, kind: TokenKindId) -> ParserId {
        self.push(ParserKind::Token {
            kind,
            match_text: None,
        })
    }

    /// Match a token of a pattern kind with specific text.
    pub fn token_text(&mut self, kind: TokenKindId, text: &str) -> ParserId {
        self.push(ParserKind::Token {
            kind,
            match_text: Some(text.to_owned()),
        })
    }

    pub fn null(&mut self, node: NodeTypeId) -> ParserId {
        self.push(ParserKind::Null(node))
    }

    pub fn predicate(&mut self, inner: ParserId, property: &str) -> ParserId {
        self.push(ParserKind::Predicate {
            inner,
            property: property.to_owned(),
        })
    }

    pub fn skip(&mut self, node: NodeTypeId) -> ParserId {
        self.push(ParserKind::Skip(node))
    }

    pub fn no_backtrack(&mut self) -> ParserId {
        self.push(ParserKind::NoBacktrack)
    }

    pub fn dont_skip(&mut self, inner: ParserId) -> ParserId {
        self.push(ParserKind::DontSkip(inner))
    }

    // Queries

    /// Direct sub-parsers. Deferred references have none.
    pub fn children(&self, id: ParserId) -> SmallVec<[ParserId; 4]> {
        match self.kind(id) {
            ParserKind::Row(parsers) | ParserKind::Or(parsers) => parsers.iter().copied().collect(),
            ParserKind::Transform { row, .. } | ParserKind::Extract { row, .. } => smallvec![*row],
            ParserKind::List {
                element, separator, ..
            } => {
                let mut children = smallvec![*element];
                children.extend(*separator);
                children
            }
            ParserKind::Opt { inner, .. }
            | ParserKind::Predicate { inner, .. }
            | ParserKind::DontSkip(inner) => smallvec![*inner],
            ParserKind::Defer(_)
            | ParserKind::Token { .. }
            | ParserKind::Null(_)
            | ParserKind::Skip(_)
            | ParserKind::NoBacktrack => SmallVec::new(),
        }
    }

    /// Whether the result of `id` is thrown away when it appears in a row.
    pub fn discards(&self, id: ParserId) -> bool {
        match self.kind(id) {
            ParserKind::Token { .. } | ParserKind::NoBacktrack => true,
            ParserKind::Row(parsers) => {
                ensure_sufficient_stack(|| parsers.iter().all(|&p| self.discards(p)))
            }
            ParserKind::Opt {
                inner,
                alternatives: None,
                ..
            }
            | ParserKind::DontSkip(inner) => ensure_sufficient_stack(|| self.discards(*inner)),
            _ => false,
        }
    }

    /// Strip wrappers that do not change what is parsed.
    pub fn unwrap_dont_skip(&self, id: ParserId) -> ParserId {
        match self.kind(id) {
            ParserKind::DontSkip(inner) => *inner,
            _ => id,
        }
    }

    /// What `id` yields. Deferred references are followed through rules;
    /// a rule revisited while its own type is being computed contributes
    /// nothing.
    pub fn type_of(&self, id: ParserId) -> ParserType {
        self.type_of_guarded(id, &mut FxHashSet::default())
    }

    fn type_of_guarded(&self, id: ParserId, visiting: &mut FxHashSet<RuleId>) -> ParserType {
        match self.kind(id) {
            ParserKind::Transform { node, .. }
            | ParserKind::List { node, .. }
            | ParserKind::Null(node)
            | ParserKind::Skip(node) => ParserType::Node(*node),
            ParserKind::Opt {
                alternatives: Some(alternatives),
                ..
            } => ParserType::Node(alternatives.base),
            ParserKind::Opt { inner, .. }
            | ParserKind::Predicate { inner, .. }
            | ParserKind::DontSkip(inner) => {
                ensure_sufficient_stack(|| self.type_of_guarded(*inner, visiting))
            }
            ParserKind::Token { .. } => ParserType::Token,
            ParserKind::Row(_) | ParserKind::NoBacktrack => ParserType::Nothing,
            ParserKind::Extract { row, index } => match self.kind(*row) {
                ParserKind::Row(parsers) => parsers
                    .get(*index)
                    .map_or(ParserType::Nothing, |&p| {
                        ensure_sufficient_stack(|| self.type_of_guarded(p, visiting))
                    }),
                _ => ParserType::Nothing,
            },
            ParserKind::Defer(rule) => {
                let Some(root) = self.resolve(*rule) else {
                    return ParserType::Nothing;
                };
                if !visiting.insert(*rule) {
                    return ParserType::Nothing;
                }
                let ty = ensure_sufficient_stack(|| self.type_of_guarded(root, visiting));
                visiting.remove(rule);
                ty
            }
            ParserKind::Or(branches) => {
                let mut result: Option<ParserType> = None;
                for &branch in branches {
                    let ty = ensure_sufficient_stack(|| self.type_of_guarded(branch, visiting));
                    result = Some(match (result, ty) {
                        (_, ParserType::Nothing) => continue,
                        (None, ty) => ty,
                        (Some(ParserType::Node(a)), ParserType::Node(b)) => self
                            .nodes
                            .common_ancestor(a, b)
                            .map_or(ParserType::Nothing, ParserType::Node),
                        (Some(ParserType::Token), ParserType::Token) => ParserType::Token,
                        _ => ParserType::Nothing,
                    });
                }
                result.unwrap_or(ParserType::Nothing)
            }
        }
    }

    /// Human-readable description of `id`, for diagnostics.
    pub fn describe(&self, id: ParserId) -> String {
        let parser = self.parser(id);
        let head = match &parser.kind {
            ParserKind::Transform { node, .. } => format!("Transform({})", self.nodes.name(*node)),
            ParserKind::List { node, .. } => format!("List({})", self.nodes.name(*node)),
            ParserKind::Null(node) => format!("Null({})", self.nodes.name(*node)),
            ParserKind::Skip(node) => format!("Skip({})", self.nodes.name(*node)),
            ParserKind::Extract { index, .. } => format!("Pick[{index}]"),
            ParserKind::Defer(rule) => format!("Defer({})", self.rule(*rule).name),
            ParserKind::Predicate { property, .. } => format!("Predicate({property})"),
            ParserKind::Token { kind, match_text } => match match_text {
                Some(text) => format!("Token({} {text:?})", self.tokens.name(*kind)),
                None => format!("Token({})", self.tokens.name(*kind)),
            },
            ParserKind::Opt {
                alternatives: Some(alternatives),
                ..
            } => format!("Opt.as_bool({})", self.nodes.name(alternatives.base)),
            other => other.name().to_owned(),
        };
        if parser.span.is_dummy() {
            head
        } else {
            format!("{head} at {:?}", parser.span)
        }
    }
}

#[cfg(test)]
mod tests;
