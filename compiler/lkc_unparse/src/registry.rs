//! The per-session unparser registry.
//!
//! The registry is filled in three steps, run in order by
//! [`build_unparsers`](crate::build_unparsers):
//!
//! 1. [`Unparsers::compute`] walks every rule, records which parsers produce
//!    which node types, and derives one unparser per occurrence.
//! 2. [`Unparsers::check_nodes_to_rules`] warns about node types nothing
//!    produces, and checks that all producers of a node type agree on its
//!    shape.
//! 3. [`Unparsers::finalize`] merges the occurrences of each node type into a
//!    single unparser and harvests the global token-sequence table.
//!
//! Generation can be soft-aborted at any step: the session keeps compiling,
//! but no unparser is exposed at the end.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use lkc_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, WarningSet};
use lkc_ir::{
    ensure_sufficient_stack, Grammar, NodeTypeId, ParserId, ParserKind, RuleId, TokenKindId,
};
use rustc_hash::FxHashMap;

use crate::config::UnparseConfig;
use crate::creates_node::creates_node;
use crate::derive::{derive_node_unparser, Derivation};
use crate::dump::{Dump, UnparseCx};
use crate::node::NodeUnparser;
use crate::struct_eq::{find_canonical_parser, structurally_equal};
use crate::token::{TokenSequence, TokenTable, TokenUnparserId};
use crate::UnparseProblem;

/// Unparsers for every node type of one grammar.
#[derive(Clone, Debug)]
pub struct Unparsers {
    config: UnparseConfig,
    /// Starts as "generation requested"; only ever goes from true to false.
    enabled: bool,
    /// Producing parsers per node type, in encounter order.
    nodes_to_rules: BTreeMap<NodeTypeId, Vec<ParserId>>,
    /// One derived unparser per producing parser, until `finalize`.
    occurrences: FxHashMap<NodeTypeId, Vec<NodeUnparser>>,
    canonical: FxHashMap<NodeTypeId, ParserId>,
    final_unparsers: BTreeMap<NodeTypeId, NodeUnparser>,
    tokens: TokenTable,
    token_sequences: Vec<TokenSequence>,
    sequence_index: FxHashMap<TokenSequence, usize>,
}

impl Unparsers {
    pub fn new(config: UnparseConfig) -> Self {
        Unparsers {
            enabled: config.generation_requested(),
            config,
            nodes_to_rules: BTreeMap::new(),
            occurrences: FxHashMap::default(),
            canonical: FxHashMap::default(),
            final_unparsers: BTreeMap::new(),
            tokens: TokenTable::new(),
            token_sequences: Vec::new(),
            sequence_index: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &UnparseConfig {
        &self.config
    }

    /// Whether unparsers are still being generated in this session.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Walk `rule`, recording every node-producing parser it contains.
    ///
    /// Rules generated for `DontSkip` produce no nodes and are ignored.
    #[tracing::instrument(level = "debug", skip_all, fields(rule = %grammar.rule(rule).name))]
    pub fn compute(
        &mut self,
        grammar: &Grammar,
        rule: RuleId,
        queue: &mut DiagnosticQueue,
    ) -> Result<(), UnparseProblem> {
        let def = grammar.rule(rule);
        if def.dont_skip {
            return Ok(());
        }
        let Some(root) = grammar.resolve(rule) else {
            return Err(UnparseProblem::internal(format!(
                "rule '{}' is declared but never defined",
                def.name
            )));
        };

        self.walk(grammar, &def.name, root, true)?;

        if !creates_node(grammar, root) {
            self.abort(&format!("'{}' toplevel rule loses information.", def.name), queue);
        }
        Ok(())
    }

    fn walk(
        &mut self,
        grammar: &Grammar,
        rule: &str,
        parser: ParserId,
        mut toplevel: bool,
    ) -> Result<(), UnparseProblem> {
        match grammar.kind(parser) {
            // Error recovery creates nodes out of thin air: it says nothing
            // about how to unparse them.
            ParserKind::Skip(_) | ParserKind::Null(_) | ParserKind::Or(_) => {}
            ParserKind::Opt {
                alternatives: Some(alternatives),
                ..
            } => {
                for node in alternatives.iter() {
                    self.record(grammar, node, parser)?;
                }
                toplevel = false;
            }
            ParserKind::Transform { node, .. } | ParserKind::List { node, .. } => {
                self.record(grammar, *node, parser)?;
                toplevel = false;
            }
            // In best-effort mode the root check in `compute` soft-aborts
            // instead, since such a root never creates a node.
            ParserKind::Extract { row, .. } => {
                if toplevel
                    && self.enabled
                    && self.config.rejects_top_level_loss()
                    && !is_termination_pick(grammar, *row)
                {
                    return Err(UnparseProblem::TopLevelInformationLoss {
                        rule: rule.to_owned(),
                        span: grammar.span(parser),
                    });
                }
            }
            ParserKind::Row(_)
            | ParserKind::Opt { .. }
            | ParserKind::Defer(_)
            | ParserKind::Token { .. }
            | ParserKind::Predicate { .. }
            | ParserKind::NoBacktrack
            | ParserKind::DontSkip(_) => {}
        }

        for child in grammar.children(parser) {
            ensure_sufficient_stack(|| self.walk(grammar, rule, child, toplevel))?;
        }
        Ok(())
    }

    fn record(
        &mut self,
        grammar: &Grammar,
        node: NodeTypeId,
        parser: ParserId,
    ) -> Result<(), UnparseProblem> {
        tracing::debug!(
            node = grammar.nodes.name(node),
            parser = %grammar.describe(parser),
            "node occurrence"
        );
        self.nodes_to_rules.entry(node).or_default().push(parser);

        let derivation = Derivation::attempt(self.enabled, || {
            derive_node_unparser(grammar, &mut self.tokens, node, parser)
        });
        if let Some(unparser) = derivation.into_result()? {
            self.occurrences.entry(node).or_default().push(unparser);
        }
        Ok(())
    }

    /// Stop generating unparsers for the rest of the session.
    ///
    /// This is not an error: the grammar stays valid, it just cannot be
    /// unparsed automatically.
    fn abort(&mut self, message: &str, queue: &mut DiagnosticQueue) {
        tracing::debug!(reason = message, "unparser generation aborted");
        queue.warn_if(
            self.config.warnings,
            WarningSet::UNPARSER_BAD_GRAMMAR,
            self.config.generation_requested(),
            || {
                Diagnostic::warning(ErrorCode::W3002).with_message(format!(
                    "{message} This prevents the generation of an automatic unparser."
                ))
            },
        );
        self.enabled = false;
    }

    /// Check that every concrete node type is produced somewhere, and that
    /// all producers of a node type agree on its shape.
    pub fn check_nodes_to_rules(&mut self, grammar: &Grammar, queue: &mut DiagnosticQueue) {
        for node in grammar.nodes.ids() {
            let nodes = &grammar.nodes;
            queue.warn_if(
                self.config.warnings,
                WarningSet::UNUSED_NODE_TYPE,
                !self.nodes_to_rules.contains_key(&node)
                    && !nodes.is_abstract(node)
                    && !nodes.is_synthetic(node)
                    && !nodes.is_base_list(node),
                || {
                    Diagnostic::warning(ErrorCode::W3001).with_message(format!(
                        "{} has no parser, and is marked neither abstract nor synthetic",
                        nodes.name(node)
                    ))
                },
            );
        }

        if !self.enabled {
            return;
        }

        let mut irregular = None;
        for (&node, parsers) in &self.nodes_to_rules {
            if !structurally_equal(grammar, parsers) {
                irregular = Some(node);
                break;
            }
            if let Some(canonical) = find_canonical_parser(grammar, parsers) {
                tracing::debug!(
                    node = grammar.nodes.name(node),
                    parser = %grammar.describe(canonical),
                    "canonical parser"
                );
                self.canonical.insert(node, canonical);
            }
        }
        if let Some(node) = irregular {
            self.abort(
                &format!(
                    "Node {} is parsed in different incompatible ways.",
                    grammar.nodes.name(node)
                ),
                queue,
            );
        }
    }

    /// Merge the occurrences of each node type into its final unparser.
    ///
    /// Node types are processed in declaration order, so the token-sequence
    /// table is the same from one run to the next.
    pub fn finalize(&mut self, grammar: &Grammar) -> Result<(), UnparseProblem> {
        if !self.enabled {
            self.occurrences.clear();
            self.final_unparsers.clear();
            return Ok(());
        }

        for node in grammar.nodes.ids() {
            let Some(occurrences) = self.occurrences.remove(&node) else {
                continue;
            };
            let mut real = occurrences.into_iter().filter(|u| !u.is_null());
            let Some(first) = real.next() else {
                return Err(UnparseProblem::internal(format!(
                    "No non-null unparser for non-synthetic node: {}",
                    grammar.nodes.name(node)
                )));
            };
            let cx = UnparseCx::new(&grammar.nodes, &self.tokens);
            let combined = real.try_fold(first, |acc, next| acc.combine(next, cx))?;

            let mut sequences = Vec::new();
            combined.collect(&mut sequences);
            for sequence in sequences {
                self.intern_sequence(sequence);
            }
            self.final_unparsers.insert(node, combined);
        }
        Ok(())
    }

    fn intern_sequence(&mut self, sequence: TokenSequence) {
        if self.sequence_index.contains_key(&sequence) {
            return;
        }
        self.sequence_index
            .insert(sequence.clone(), self.token_sequences.len());
        self.token_sequences.push(sequence);
    }

    // Queries

    /// Parsers recorded as producing `node`, in encounter order.
    pub fn nodes_to_rules(&self, node: NodeTypeId) -> &[ParserId] {
        self.nodes_to_rules.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Unparsers derived so far for `node`, before `finalize` merges them.
    pub fn occurrences(&self, node: NodeTypeId) -> &[NodeUnparser] {
        self.occurrences.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn canonical_parser(&self, node: NodeTypeId) -> Option<ParserId> {
        self.canonical.get(&node).copied()
    }

    pub fn final_unparser(&self, node: NodeTypeId) -> Option<&NodeUnparser> {
        self.final_unparsers.get(&node)
    }

    /// Final unparsers in node-type declaration order.
    pub fn final_unparsers(&self) -> impl Iterator<Item = (NodeTypeId, &NodeUnparser)> {
        self.final_unparsers.iter().map(|(&node, u)| (node, u))
    }

    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    /// All token unparsers, ordered by rendered text.
    pub fn sorted_token_unparsers(&self) -> Vec<TokenUnparserId> {
        self.tokens.sorted()
    }

    /// Distinct token sequences of the final unparsers, in first-seen order.
    pub fn token_sequences(&self) -> &[TokenSequence] {
        &self.token_sequences
    }

    /// Position of `sequence` in [`Unparsers::token_sequences`].
    pub fn sequence_index(&self, sequence: &TokenSequence) -> Option<usize> {
        self.sequence_index.get(sequence).copied()
    }

    /// Dump of every final unparser, in node-type declaration order.
    pub fn dump_final(&self, grammar: &Grammar) -> String {
        let cx = UnparseCx::new(&grammar.nodes, &self.tokens);
        let mut out = String::new();
        for unparser in self.final_unparsers.values() {
            unparser.dump(cx, &mut out);
        }
        out
    }

    /// Dump of the token table, one rendered token per line.
    pub fn dump_tokens(&self) -> String {
        let mut out = String::new();
        for id in self.sorted_token_unparsers() {
            let _ = writeln!(out, "{}", self.tokens.text(id));
        }
        out
    }
}

/// Whether `row` is `[x, Termination]`: dropping the termination token loses
/// nothing.
fn is_termination_pick(grammar: &Grammar, row: ParserId) -> bool {
    match grammar.kind(row) {
        ParserKind::Row(parsers) => match parsers.as_slice() {
            &[_, term] => matches!(
                grammar.kind(term),
                ParserKind::Token { kind, .. } if *kind == TokenKindId::TERMINATION
            ),
            _ => false,
        },
        _ => false,
    }
}
