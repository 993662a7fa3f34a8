//! Textual dumps of unparsers, for debugging and tests.

use lkc_ir::NodeTypes;

use crate::token::{TokenSequence, TokenTable, TokenUnparserId};

/// Registries needed to name the parts of an unparser.
#[derive(Copy, Clone)]
pub struct UnparseCx<'a> {
    pub nodes: &'a NodeTypes,
    pub tokens: &'a TokenTable,
}

impl<'a> UnparseCx<'a> {
    pub fn new(nodes: &'a NodeTypes, tokens: &'a TokenTable) -> Self {
        UnparseCx { nodes, tokens }
    }
}

/// Debug representation of an unparser or one of its components.
pub trait Dump {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String);

    fn dumps(&self, cx: UnparseCx<'_>) -> String {
        let mut out = String::new();
        self.dump(cx, &mut out);
        out
    }
}

impl Dump for TokenUnparserId {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String) {
        out.push_str(cx.tokens.text(*self));
    }
}

impl Dump for TokenSequence {
    fn dump(&self, cx: UnparseCx<'_>, out: &mut String) {
        out.push_str(&self.render(cx.tokens));
    }
}
