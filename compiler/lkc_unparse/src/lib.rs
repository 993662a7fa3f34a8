//! Unparser derivation for the lkc grammar compiler.
//!
//! An unparser describes how to turn a node back into source text: fixed
//! token runs interleaved with the node's fields. This crate derives one for
//! every node type from the parsers that build it:
//!
//! - **Token unparsers** ([`TokenTable`], [`TokenSequence`]): interned token
//!   renderings and the fixed runs built from them.
//! - **Node unparsers** ([`NodeUnparser`], [`FieldUnparser`]): the shape of
//!   one node type, derived per producing parser and merged with
//!   [`NodeUnparser::combine`].
//! - **Grammar analyses** ([`creates_node`], [`structurally_equal`]): pure
//!   functions over the combinator tree deciding whether generation is
//!   sound.
//! - **Registry** ([`Unparsers`]): the per-session state driven by
//!   [`build_unparsers`].
//!
//! # Failure modes
//!
//! - A grammar shape unparsers cannot express, or two producers of a node
//!   that disagree on its tokens, is an [`UnparseProblem`] and stops the
//!   compilation.
//! - A grammar that is valid but cannot be unparsed soundly (a rule dropping
//!   parsed elements, or a node type parsed in several shapes) only disables
//!   generation, with a warning.
//!
//! # Crate Dependencies
//!
//! `lkc_unparse` depends on `lkc_ir` for the grammar and its registries, and
//! on `lkc_diagnostic` for reporting.

mod config;
mod creates_node;
mod derive;
mod dump;
mod field;
mod node;
mod problem;
mod registry;
mod struct_eq;
mod token;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

use lkc_diagnostic::{DiagnosticQueue, ErrorGuaranteed};
use lkc_ir::Grammar;

pub use config::{UnparseConfig, UnparseMode};
pub use creates_node::creates_node;
pub use derive::{derive_node_unparser, split_extract, Derivation};
pub use dump::{Dump, UnparseCx};
pub use field::FieldUnparser;
pub use node::{ListNodeUnparser, NodeUnparser, RegularNodeUnparser};
pub use problem::UnparseProblem;
pub use registry::Unparsers;
pub use struct_eq::{find_canonical_parser, structurally_equal};
pub use token::{TokenSequence, TokenTable, TokenUnparser, TokenUnparserId};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Safe to call more than once; does nothing when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Run the unparser pass over every rule of `grammar`.
///
/// Warnings go to `queue`. The first fatal problem is emitted there too,
/// and no registry is returned.
#[tracing::instrument(level = "debug", skip_all, fields(rules = grammar.rules().count()))]
pub fn build_unparsers(
    grammar: &Grammar,
    config: UnparseConfig,
    queue: &mut DiagnosticQueue,
) -> Result<Unparsers, ErrorGuaranteed> {
    let mut unparsers = Unparsers::new(config);
    match run(grammar, &mut unparsers, queue) {
        Ok(()) => {
            tracing::debug!(enabled = unparsers.is_enabled(), "unparsers complete");
            Ok(unparsers)
        }
        Err(problem) => Err(queue.emit_error(problem.into_diagnostic())),
    }
}

fn run(
    grammar: &Grammar,
    unparsers: &mut Unparsers,
    queue: &mut DiagnosticQueue,
) -> Result<(), UnparseProblem> {
    for (rule, _) in grammar.rules() {
        unparsers.compute(grammar, rule, queue)?;
    }
    unparsers.check_nodes_to_rules(grammar, queue);
    unparsers.finalize(grammar)
}
