//! Whether a parser directly creates a node.

use lkc_ir::{ensure_sufficient_stack, Grammar, ParserId, ParserKind, TokenKindId};


/// Whether `parser` creates a node directly, or only refers to parsers that
/// do, with no extra parsing that would be lost.
///
/// ```text
/// Transform(..)        true
/// Or(a, b)             true if both a and b create nodes
/// Row(a, b)            false
/// Pick(";", x)         false
/// Pick(x, Termination) true if x creates a node
/// ```
pub fn creates_node(grammar: &Grammar, parser: ParserId) -> bool {
    match grammar.kind(parser) {
        ParserKind::Or(branches) => ensure_sufficient_stack(|| {
            branches.iter().all(|&branch| creates_node(grammar, branch))
        }),
        ParserKind::Defer(_) => grammar.type_of(parser).node().is_some(),
        ParserKind::Opt {
            alternatives: Some(_),
            ..
        }
        | ParserKind::Transform { .. }
        | ParserKind::Skip(_)
        | ParserKind::List { .. } => true,
        ParserKind::Opt { inner, .. }
        | ParserKind::Predicate { inner, .. }
        | ParserKind::DontSkip(inner) => ensure_sufficient_stack(|| creates_node(grammar, *inner)),
        // The termination token carries nothing, so dropping it loses no
        // information.
        ParserKind::Extract { row, .. } => match grammar.kind(*row) {
            ParserKind::Row(subparsers) => match subparsers.as_slice() {
                &[node, term] => {
                    matches!(
                        grammar.kind(term),
                        ParserKind::Token { kind, .. } if *kind == TokenKindId::TERMINATION
                    ) && ensure_sufficient_stack(|| creates_node(grammar, node))
                }
                _ => false,
            },
            _ => false,
        },
        ParserKind::Row(_)
        | ParserKind::Token { .. }
        | ParserKind::Null(_)
        | ParserKind::NoBacktrack => false,
    }
}

#[cfg(test)]
mod tests;
