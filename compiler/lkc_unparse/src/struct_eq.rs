//! Structural equivalence of parsers, as far as unparsing is concerned.
//!
//! When several parsers build the same node type, they must all unparse the
//! same way. Two parsers are structurally equal when they have the same
//! combinator shape with the same tokens in the same slots. Node-creating
//! sub-parsers are compared only by the fact that they create nodes: each
//! of them is checked on its own when its node type is checked.

use std::mem::discriminant;

use lkc_ir::{ensure_sufficient_stack, Grammar, ParserId, ParserKind};
use smallvec::SmallVec;

use crate::creates_node::creates_node;

type Parsers = SmallVec<[ParserId; 4]>;

/// Whether all `parsers`, producers of the same node type, unparse alike.
///
/// Tokens are compared by kind only. Two tokens of the same kind with
/// different texts pass here; [`Unparsers::finalize`] rejects them when it
/// combines the occurrences (E3005, or E3006 for list separators).
///
/// [`Unparsers::finalize`]: crate::Unparsers::finalize
pub fn structurally_equal(grammar: &Grammar, parsers: &[ParserId]) -> bool {
    let result = struct_eq(grammar, parsers, true);
    tracing::debug!(count = parsers.len(), result, "structural equivalence");
    result
}

fn struct_eq(grammar: &Grammar, parsers: &[ParserId], toplevel: bool) -> bool {
    let parsers: Parsers = parsers
        .iter()
        .map(|&p| strip_wrappers(grammar, p))
        .filter(|&p| !matches!(grammar.kind(p), ParserKind::Null(_)))
        .collect();

    tracing::trace!(
        parsers = ?parsers.iter().map(|&p| grammar.describe(p)).collect::<Vec<_>>(),
        toplevel,
        "comparing"
    );

    let Some(&first) = parsers.first() else {
        return true;
    };
    if parsers.len() == 1 {
        return true;
    }

    let first_kind = grammar.kind(first);
    let same_kind = parsers
        .iter()
        .all(|&p| discriminant(grammar.kind(p)) == discriminant(first_kind));

    if same_kind {
        match first_kind {
            ParserKind::Row(_)
            | ParserKind::Transform { .. }
            | ParserKind::List { .. }
            | ParserKind::Opt { .. } => {
                return ensure_sufficient_stack(|| children_equal(grammar, &parsers));
            }
            // Same kind is enough: differing texts are reported when the
            // occurrences are combined.
            ParserKind::Token { kind, .. } => {
                return parsers.iter().all(|&p| {
                    matches!(grammar.kind(p), ParserKind::Token { kind: other, .. } if other == kind)
                });
            }
            ParserKind::Extract { index, .. } => {
                let same_index = parsers.iter().all(|&p| {
                    matches!(grammar.kind(p), ParserKind::Extract { index: other, .. } if other == index)
                });
                let rows: Parsers = parsers.iter().flat_map(|&p| grammar.children(p)).collect();
                return same_index && ensure_sufficient_stack(|| struct_eq(grammar, &rows, false));
            }
            ParserKind::NoBacktrack => return true,
            // Compared by what they resolve to, below.
            ParserKind::Defer(_)
            | ParserKind::Or(_)
            | ParserKind::Skip(_)
            | ParserKind::Null(_)
            | ParserKind::Predicate { .. }
            | ParserKind::DontSkip(_) => {}
        }
    }

    // The shape of a rule's root must be established concretely.
    if toplevel {
        return false;
    }

    parsers.iter().all(|&p| {
        let resolved = match grammar.kind(p) {
            ParserKind::Defer(rule) => grammar.resolve(*rule),
            _ => Some(p),
        };
        resolved.is_some_and(|p| creates_node(grammar, p))
    })
}

/// Same number of children (ignoring no-backtrack markers), and each
/// column of children structurally equal.
fn children_equal(grammar: &Grammar, parsers: &[ParserId]) -> bool {
    let children: SmallVec<[Parsers; 4]> = parsers
        .iter()
        .map(|&p| {
            grammar
                .children(p)
                .into_iter()
                .filter(|&c| !matches!(grammar.kind(c), ParserKind::NoBacktrack))
                .collect()
        })
        .collect();

    let width = children[0].len();
    if children.iter().any(|c| c.len() != width) {
        return false;
    }
    (0..width).all(|i| {
        let column: Parsers = children.iter().map(|c| c[i]).collect();
        struct_eq(grammar, &column, false)
    })
}

/// Strip wrappers that do not change what gets unparsed.
fn strip_wrappers(grammar: &Grammar, mut parser: ParserId) -> ParserId {
    loop {
        match grammar.kind(parser) {
            ParserKind::DontSkip(inner) | ParserKind::Predicate { inner, .. } => parser = *inner,
            _ => return parser,
        }
    }
}

/// The parser used to represent a node type among its `parsers`.
///
/// Prefers the first parser that has no `Null` anywhere inside it, since
/// it shows every field; otherwise the first parser.
pub fn find_canonical_parser(grammar: &Grammar, parsers: &[ParserId]) -> Option<ParserId> {
    parsers
        .iter()
        .copied()
        .find(|&p| !has_null(grammar, p))
        .or_else(|| parsers.first().copied())
}

fn has_null(grammar: &Grammar, parser: ParserId) -> bool {
    matches!(grammar.kind(parser), ParserKind::Null(_))
        || ensure_sufficient_stack(|| {
            grammar
                .children(parser)
                .into_iter()
                .any(|child| has_null(grammar, child))
        })
}

#[cfg(test)]
mod tests;
