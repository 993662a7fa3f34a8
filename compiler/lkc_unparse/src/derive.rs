//! Derivation of node unparsers from the parsers that build nodes.
//!
//! Given a node type and one parser known to produce it, the derivation
//! matches the parser's shape against the unparser shapes:
//!
//! | Parser                   | Unparser                               |
//! |--------------------------|----------------------------------------|
//! | `Transform` of token node| `TokenNode`                            |
//! | `Transform`              | `Regular`, tokens split around fields  |
//! | `List`                   | `List` with its separator              |
//! | boolean `Opt`            | `Regular`, tokens only when present    |
//! | other `Opt`              | whatever its inner parser derives      |
//! | `Null`                   | `Null`                                 |
//!
//! Anything else cannot be unparsed automatically.

use lkc_ir::{ensure_sufficient_stack, Grammar, NodeTypeId, ParserId, ParserKind, ParserType};

use crate::field::FieldUnparser;
use crate::node::{ListNodeUnparser, NodeUnparser, RegularNodeUnparser};
use crate::token::{TokenSequence, TokenTable};
use crate::UnparseProblem;

/// Outcome of one derivation attempt during the grammar walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Derivation {
    Derived(NodeUnparser),
    /// The parser has a shape unparsers cannot express. Fatal.
    Unsupported(UnparseProblem),
    /// Generation was disabled earlier in the session; nothing was tried.
    SessionAborted,
}

impl Derivation {
    /// Run `derive` only while generation is still enabled.
    pub fn attempt(
        enabled: bool,
        derive: impl FnOnce() -> Result<NodeUnparser, UnparseProblem>,
    ) -> Self {
        if !enabled {
            return Derivation::SessionAborted;
        }
        match derive() {
            Ok(unparser) => Derivation::Derived(unparser),
            Err(problem) => Derivation::Unsupported(problem),
        }
    }

    /// The derived unparser, `None` when the session is aborted.
    pub fn into_result(self) -> Result<Option<NodeUnparser>, UnparseProblem> {
        match self {
            Derivation::Derived(unparser) => Ok(Some(unparser)),
            Derivation::Unsupported(problem) => Err(problem),
            Derivation::SessionAborted => Ok(None),
        }
    }
}

/// Derive the unparser for one occurrence of `node`, built by `parser`.
///
/// `node` must be concrete. Token unparsers are interned in `tokens`.
pub fn derive_node_unparser(
    grammar: &Grammar,
    tokens: &mut TokenTable,
    node: NodeTypeId,
    parser: ParserId,
) -> Result<NodeUnparser, UnparseProblem> {
    Deriver { grammar, tokens }.node_unparser(node, parser)
}

/// Split an `Extract` parser into the tokens before the extracted element,
/// the element's parser, and the tokens after it.
pub fn split_extract(
    grammar: &Grammar,
    tokens: &mut TokenTable,
    parser: ParserId,
) -> Result<(TokenSequence, ParserId, TokenSequence), UnparseProblem> {
    Deriver { grammar, tokens }.split_extract(parser)
}

struct Deriver<'a> {
    grammar: &'a Grammar,
    tokens: &'a mut TokenTable,
}

impl Deriver<'_> {
    fn node_unparser(
        &mut self,
        node: NodeTypeId,
        parser: ParserId,
    ) -> Result<NodeUnparser, UnparseProblem> {
        let grammar = self.grammar;
        let nodes = &grammar.nodes;
        if nodes.is_abstract(node) || nodes.is_synthetic(node) {
            return Err(UnparseProblem::internal(format!(
                "Invalid unparser request for {}",
                nodes.name(node)
            )));
        }
        let parser = grammar.unwrap_dont_skip(parser);

        if nodes.is_token_node(node) {
            return if self.is_single_token_transform(parser) {
                Ok(NodeUnparser::TokenNode(node))
            } else {
                Err(UnparseProblem::UnsupportedTokenNodeParser {
                    parser: grammar.describe(parser),
                    span: grammar.span(parser),
                })
            };
        }

        match grammar.kind(parser) {
            ParserKind::Transform { row, .. } => self.transform_unparser(node, parser, *row),
            ParserKind::List { separator, .. } => {
                let separator = separator
                    .map(|sep| self.tokens.from_parser(grammar, sep))
                    .transpose()?;
                Ok(NodeUnparser::List(ListNodeUnparser { node, separator }))
            }
            ParserKind::Opt {
                inner,
                alternatives: Some(alternatives),
                ..
            } => {
                // The absent alternative consumes nothing: only the present
                // one carries the wrapped tokens.
                let mut result = RegularNodeUnparser::new(node, nodes);
                if node == alternatives.present {
                    self.emit_to_token_sequence(*inner, &mut result.pre_tokens)?;
                }
                Ok(NodeUnparser::Regular(result))
            }
            ParserKind::Opt { inner, .. } => {
                let inner = *inner;
                ensure_sufficient_stack(|| self.node_unparser(node, inner))
            }
            ParserKind::Null(_) => Ok(NodeUnparser::Null(node)),
            _ => Err(UnparseProblem::UnsupportedParser {
                parser: grammar.describe(parser),
                span: grammar.span(parser),
            }),
        }
    }

    /// `Transform` of a row holding one token and maybe no-backtrack markers.
    fn is_single_token_transform(&self, parser: ParserId) -> bool {
        let grammar = self.grammar;
        let ParserKind::Transform { row, .. } = grammar.kind(parser) else {
            return false;
        };
        let ParserKind::Row(subparsers) = grammar.kind(*row) else {
            return false;
        };
        let mut significant = subparsers
            .iter()
            .filter(|&&p| !matches!(grammar.kind(p), ParserKind::NoBacktrack));
        matches!(
            (significant.next(), significant.next()),
            (Some(&token), None) if matches!(grammar.kind(token), ParserKind::Token { .. })
        )
    }

    /// Split the row into pre tokens, fields, inter-field tokens and post
    /// tokens.
    fn transform_unparser(
        &mut self,
        node: NodeTypeId,
        parser: ParserId,
        row: ParserId,
    ) -> Result<NodeUnparser, UnparseProblem> {
        let grammar = self.grammar;
        let ParserKind::Row(subparsers) = grammar.kind(row) else {
            return Err(UnparseProblem::internal(format!(
                "{} does not wrap a row",
                grammar.describe(parser)
            )));
        };

        let mut result = RegularNodeUnparser::new(node, &grammar.nodes);
        let field_count = result.fields.len();
        let mut next_field = 0;

        for &subparser in subparsers {
            if grammar.discards(subparser) {
                let sequence = if next_field == 0 {
                    &mut result.pre_tokens
                } else if next_field < field_count {
                    &mut result.inter_tokens[next_field - 1]
                } else {
                    &mut result.post_tokens
                };
                self.emit_to_token_sequence(subparser, sequence)?;
            } else {
                let Some(field) = result.fields.get_mut(next_field) else {
                    return Err(UnparseProblem::internal(format!(
                        "{} parses more fields than {} declares",
                        grammar.describe(parser),
                        grammar.nodes.name(node)
                    )));
                };
                self.emit_to_field_unparser(subparser, field)?;
                next_field += 1;
            }
        }

        if next_field != field_count {
            return Err(UnparseProblem::internal(format!(
                "{} parses {next_field} fields, {} declares {field_count}",
                grammar.describe(parser),
                grammar.nodes.name(node)
            )));
        }
        Ok(NodeUnparser::Regular(result))
    }

    /// Append the fixed tokens `parser` matches to `sequence`.
    fn emit_to_token_sequence(
        &mut self,
        parser: ParserId,
        sequence: &mut TokenSequence,
    ) -> Result<(), UnparseProblem> {
        let grammar = self.grammar;
        let parser = grammar.unwrap_dont_skip(parser);
        match grammar.kind(parser) {
            ParserKind::Row(subparsers) => ensure_sufficient_stack(|| {
                subparsers
                    .iter()
                    .try_for_each(|&subparser| self.emit_to_token_sequence(subparser, sequence))
            }),
            ParserKind::Token { .. } => {
                sequence.push(self.tokens.from_parser(grammar, parser)?);
                Ok(())
            }
            ParserKind::Opt {
                inner,
                is_error: true,
                ..
            } => {
                let inner = *inner;
                ensure_sufficient_stack(|| self.emit_to_token_sequence(inner, sequence))
            }
            ParserKind::DontSkip(_) | ParserKind::NoBacktrack => Ok(()),
            _ => Err(UnparseProblem::StaticTokensExpected {
                parser: grammar.describe(parser),
                span: grammar.span(parser),
            }),
        }
    }

    /// Complete `field` with what `parser`, the parser of that field, tells.
    fn emit_to_field_unparser(
        &mut self,
        parser: ParserId,
        field: &mut FieldUnparser,
    ) -> Result<(), UnparseProblem> {
        let grammar = self.grammar;
        let parser = grammar.unwrap_dont_skip(parser);
        match grammar.kind(parser) {
            ParserKind::Defer(_)
            | ParserKind::List { .. }
            | ParserKind::Null(_)
            | ParserKind::Transform { .. }
            | ParserKind::Opt {
                alternatives: Some(_),
                ..
            } => {
                // Straight to node creation: no tokens around the field.
                let is_null = matches!(grammar.kind(parser), ParserKind::Null(_));
                field.always_absent = field.always_absent && is_null;
                Ok(())
            }
            ParserKind::Opt { inner, .. } => {
                field.always_absent = false;
                let inner = *inner;
                ensure_sufficient_stack(|| self.emit_to_field_unparser(inner, field))
            }
            ParserKind::Or(branches) => {
                // The field is unparsed by recursing into the branch node, so
                // only check each branch can be unparsed on its own.
                field.always_absent = false;
                for &branch in branches {
                    ensure_sufficient_stack(|| self.check_branch(branch))?;
                }
                Ok(())
            }
            ParserKind::Extract { .. } => {
                field.always_absent = false;
                let (pre, inner, post) = self.split_extract(parser)?;
                field.pre_tokens = field.pre_tokens.concat(&pre);
                field.post_tokens = post.concat(&field.post_tokens);
                ensure_sufficient_stack(|| self.emit_to_field_unparser(inner, field))
            }
            _ => Err(UnparseProblem::UnsupportedFieldParser {
                parser: grammar.describe(parser),
                span: grammar.span(parser),
            }),
        }
    }

    /// Derive (and drop) the unparser of one alternation branch.
    ///
    /// Deferred references are checked where their rule is walked, and
    /// error-recovery nodes are never unparsed.
    fn check_branch(&mut self, branch: ParserId) -> Result<(), UnparseProblem> {
        let grammar = self.grammar;
        let branch = grammar.unwrap_dont_skip(branch);
        match grammar.kind(branch) {
            ParserKind::Defer(_) | ParserKind::Skip(_) => Ok(()),
            ParserKind::Opt {
                alternatives: Some(alternatives),
                ..
            } => {
                let alternatives = *alternatives;
                alternatives
                    .iter()
                    .try_for_each(|alt| self.node_unparser(alt, branch).map(drop))
            }
            _ => match grammar.type_of(branch) {
                ParserType::Node(node)
                    if !grammar.nodes.is_abstract(node)
                        && !grammar.nodes.is_synthetic(node) =>
                {
                    self.node_unparser(node, branch).map(drop)
                }
                ParserType::Node(_) => Err(UnparseProblem::UnsupportedParser {
                    parser: grammar.describe(branch),
                    span: grammar.span(branch),
                }),
                ParserType::Token | ParserType::Nothing => {
                    Err(UnparseProblem::UnsupportedFieldParser {
                        parser: grammar.describe(branch),
                        span: grammar.span(branch),
                    })
                }
            },
        }
    }

    fn split_extract(
        &mut self,
        parser: ParserId,
    ) -> Result<(TokenSequence, ParserId, TokenSequence), UnparseProblem> {
        let grammar = self.grammar;
        let ParserKind::Extract { row, index } = grammar.kind(parser) else {
            return Err(UnparseProblem::internal(format!(
                "extract parser expected, got {}",
                grammar.describe(parser)
            )));
        };
        let index = *index;
        let subparsers = match grammar.kind(*row) {
            ParserKind::Row(subparsers) if index < subparsers.len() => subparsers,
            _ => {
                return Err(UnparseProblem::internal(format!(
                    "{} extracts a missing element",
                    grammar.describe(parser)
                )))
            }
        };

        let mut pre = TokenSequence::new();
        for &subparser in &subparsers[..index] {
            self.emit_to_token_sequence(subparser, &mut pre)?;
        }
        let mut post = TokenSequence::new();
        for &subparser in &subparsers[index + 1..] {
            self.emit_to_token_sequence(subparser, &mut post)?;
        }
        Ok((pre, subparsers[index], post))
    }
}
