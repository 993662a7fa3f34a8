//! Field unparsers: the fixed tokens around one parse field.

use std::fmt::Write as _;

use lkc_ir::{FieldId, NodeTypeId};

use crate::dump::{Dump, UnparseCx};
use crate::token::TokenSequence;
use crate::UnparseProblem;

/// Unparser for one parse field of a node type.
///
/// `node` can differ from the field's owner when the field is inherited.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldUnparser {
    pub node: NodeTypeId,
    pub field: FieldId,
    /// Only `Null` parsers produced this field so far, so it never appears
    /// in the source.
    pub always_absent: bool,
    /// Tokens preceding the field, emitted only when the field is present.
    pub pre_tokens: TokenSequence,
    /// Tokens following the field, emitted only when the field is present.
    pub post_tokens: TokenSequence,
}

impl FieldUnparser {
    pub fn new(node: NodeTypeId, field: FieldId) -> Self {
        FieldUnparser {
            node,
            field,
            always_absent: true,
            pre_tokens: TokenSequence::new(),
            post_tokens: TokenSequence::new(),
        }
    }

    /// Merge two occurrences of the same field.
    ///
    /// An always-absent occurrence carries no information and yields the
    /// other one. Otherwise both token runs must be equivalent.
    pub fn combine(self, other: FieldUnparser, cx: UnparseCx<'_>) -> Result<Self, UnparseProblem> {
        if self.node != other.node || self.field != other.field {
            return Err(UnparseProblem::internal(format!(
                "cannot combine unparsers of fields {} and {}",
                cx.nodes.qualname(self.field),
                cx.nodes.qualname(other.field)
            )));
        }

        if self.always_absent {
            return Ok(other);
        }
        if other.always_absent {
            return Ok(self);
        }

        let qualname = cx.nodes.qualname(self.field);
        self.pre_tokens.check_equivalence(
            &format!("prefix tokens for {qualname}"),
            &other.pre_tokens,
            cx.tokens,
        )?;
        self.post_tokens.check_equivalence(
            &format!("postfix tokens for {qualname}"),
            &other.post_tokens,
            cx.tokens,
        )?;
        Ok(self)
    }
}

impl Dump for FieldUnparser {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String) {
        let _ = writeln!(
            out,
            "   if {}: {} [field] {}",
            cx.nodes.qualname(self.field),
            self.pre_tokens.render(cx.tokens),
            self.post_tokens.render(cx.tokens),
        );
    }
}
