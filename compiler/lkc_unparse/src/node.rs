//! Node unparsers: the per-occurrence unparsing shape of one node type.

use std::fmt::Write as _;

use lkc_ir::{NodeTypeId, NodeTypes};

use crate::dump::{Dump, UnparseCx};
use crate::field::FieldUnparser;
use crate::token::{TokenSequence, TokenUnparserId};
use crate::UnparseProblem;

/// How to unparse one node type, as derived from one producing parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeUnparser {
    /// Fixed token runs interleaved with parse fields.
    Regular(RegularNodeUnparser),
    List(ListNodeUnparser),
    /// The node's text is the text of its single token.
    TokenNode(NodeTypeId),
    /// Produced by a parser that consumes nothing and yields no node.
    Null(NodeTypeId),
}

impl NodeUnparser {
    pub fn node(&self) -> NodeTypeId {
        match self {
            NodeUnparser::Regular(regular) => regular.node,
            NodeUnparser::List(list) => list.node,
            NodeUnparser::TokenNode(node) | NodeUnparser::Null(node) => *node,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NodeUnparser::Null(_))
    }

    /// Merge two occurrences for the same node type.
    ///
    /// `Null` is the identity on both sides. Any other pair must be of the
    /// same variant.
    pub fn combine(self, other: NodeUnparser, cx: UnparseCx<'_>) -> Result<Self, UnparseProblem> {
        match (self, other) {
            (NodeUnparser::Null(_), other) => Ok(other),
            (this, NodeUnparser::Null(_)) => Ok(this),
            (NodeUnparser::Regular(a), NodeUnparser::Regular(b)) if a.node == b.node => {
                a.combine(b, cx).map(NodeUnparser::Regular)
            }
            (NodeUnparser::List(a), NodeUnparser::List(b)) if a.node == b.node => {
                a.combine(&b, cx).map(NodeUnparser::List)
            }
            (NodeUnparser::TokenNode(a), NodeUnparser::TokenNode(b)) if a == b => {
                Ok(NodeUnparser::TokenNode(a))
            }
            (this, other) => Err(UnparseProblem::internal(format!(
                "Incompatible unparsers:\n{}\n... and...\n{}",
                this.dumps(cx),
                other.dumps(cx)
            ))),
        }
    }

    /// Append every token sequence of this unparser, in prefix order.
    pub fn collect(&self, sequences: &mut Vec<TokenSequence>) {
        match self {
            NodeUnparser::Regular(regular) => regular.collect(sequences),
            NodeUnparser::List(_) | NodeUnparser::TokenNode(_) | NodeUnparser::Null(_) => {}
        }
    }
}

impl Dump for NodeUnparser {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String) {
        match self {
            NodeUnparser::Regular(regular) => regular.dump(cx, out),
            NodeUnparser::List(list) => list.dump(cx, out),
            NodeUnparser::TokenNode(node) => {
                let _ = writeln!(out, "Unparser for {}", cx.nodes.name(*node));
            }
            NodeUnparser::Null(node) => {
                let _ = writeln!(out, "Unparser for {}: null", cx.nodes.name(*node));
            }
        }
    }
}

/// Unparser for a node that is neither a list nor a token node.
///
/// `inter_tokens[i]` sits between `fields[i]` and `fields[i + 1]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegularNodeUnparser {
    pub node: NodeTypeId,
    pub pre_tokens: TokenSequence,
    /// One per parse field, in field order.
    pub fields: Vec<FieldUnparser>,
    /// `fields.len() - 1` runs (none when there are no fields).
    pub inter_tokens: Vec<TokenSequence>,
    pub post_tokens: TokenSequence,
}

impl RegularNodeUnparser {
    /// Empty unparser with one always-absent field unparser per parse field.
    pub fn new(node: NodeTypeId, nodes: &NodeTypes) -> Self {
        let fields: Vec<_> = nodes
            .parse_fields(node)
            .into_iter()
            .map(|field| FieldUnparser::new(node, field))
            .collect();
        let inter_tokens = vec![TokenSequence::new(); fields.len().saturating_sub(1)];
        RegularNodeUnparser {
            node,
            pre_tokens: TokenSequence::new(),
            fields,
            inter_tokens,
            post_tokens: TokenSequence::new(),
        }
    }

    /// Each field with the token run that precedes it (none for the first).
    pub fn zip_fields(&self) -> impl Iterator<Item = (&FieldUnparser, Option<&TokenSequence>)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field, i.checked_sub(1).map(|j| &self.inter_tokens[j])))
    }

    fn combine(self, other: RegularNodeUnparser, cx: UnparseCx<'_>) -> Result<Self, UnparseProblem> {
        if self.fields.len() != other.fields.len()
            || self.inter_tokens.len() != other.inter_tokens.len()
        {
            return Err(UnparseProblem::internal(format!(
                "unparsers for {} disagree on the number of fields",
                cx.nodes.name(self.node)
            )));
        }

        let name = cx.nodes.name(self.node);
        self.pre_tokens.check_equivalence(
            &format!("prefix tokens for {name}"),
            &other.pre_tokens,
            cx.tokens,
        )?;
        for (i, (mine, theirs)) in self.inter_tokens.iter().zip(&other.inter_tokens).enumerate() {
            mine.check_equivalence(
                &format!("tokens after {}", cx.nodes.qualname(self.fields[i].field)),
                theirs,
                cx.tokens,
            )?;
        }
        self.post_tokens.check_equivalence(
            &format!("postfix tokens for {name}"),
            &other.post_tokens,
            cx.tokens,
        )?;

        let fields = self
            .fields
            .into_iter()
            .zip(other.fields)
            .map(|(mine, theirs)| mine.combine(theirs, cx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RegularNodeUnparser {
            node: self.node,
            pre_tokens: self.pre_tokens,
            fields,
            inter_tokens: self.inter_tokens,
            post_tokens: self.post_tokens,
        })
    }

    fn collect(&self, sequences: &mut Vec<TokenSequence>) {
        sequences.push(self.pre_tokens.clone());
        for (field, inter) in self.zip_fields() {
            sequences.push(field.pre_tokens.clone());
            sequences.push(field.post_tokens.clone());
            sequences.push(inter.cloned().unwrap_or_default());
        }
        sequences.push(self.post_tokens.clone());
    }
}

impl Dump for RegularNodeUnparser {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String) {
        let _ = writeln!(out, "Unparser for {}:", cx.nodes.name(self.node));
        if !self.pre_tokens.is_empty() {
            let _ = writeln!(out, "   pre: {}", self.pre_tokens.render(cx.tokens));
        }
        for (field, inter) in self.zip_fields() {
            out.push('\n');
            if let Some(inter) = inter.filter(|inter| !inter.is_empty()) {
                let _ = writeln!(out, "   tokens: {}", inter.render(cx.tokens));
            }
            field.dump(cx, out);
        }
        if !self.fields.is_empty() {
            out.push('\n');
        }
        if !self.post_tokens.is_empty() {
            let _ = writeln!(out, "   post: {}", self.post_tokens.render(cx.tokens));
        }
    }
}

/// Unparser for a list node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListNodeUnparser {
    pub node: NodeTypeId,
    /// `None` when elements are not separated.
    pub separator: Option<TokenUnparserId>,
}

impl ListNodeUnparser {
    fn combine(self, other: &ListNodeUnparser, cx: UnparseCx<'_>) -> Result<Self, UnparseProblem> {
        if cx.tokens.equivalent(self.separator, other.separator) {
            return Ok(self);
        }
        Err(UnparseProblem::InconsistentSeparator {
            node: cx.nodes.name(self.node).to_owned(),
            left: cx.tokens.text_or_none(self.separator).to_owned(),
            right: cx.tokens.text_or_none(other.separator).to_owned(),
        })
    }
}

impl Dump for ListNodeUnparser {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String) {
        let _ = writeln!(out, "Unparser for {}:", cx.nodes.name(self.node));
        if let Some(separator) = self.separator {
            let _ = writeln!(out, "   separator: {}", cx.tokens.text(separator));
        }
    }
}
