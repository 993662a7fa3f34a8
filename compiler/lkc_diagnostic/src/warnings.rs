//! User-selectable warning categories.

use bitflags::bitflags;

bitflags! {
    /// Set of enabled warning categories.
    ///
    /// A warning is only reported when its category is in the set handed
    /// to [`DiagnosticQueue::warn_if`](crate::DiagnosticQueue::warn_if).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct WarningSet: u8 {
        /// Concrete node type that no grammar rule produces.
        const UNUSED_NODE_TYPE = 1 << 0;
        /// Grammar shape that prevents automatic unparser generation.
        const UNPARSER_BAD_GRAMMAR = 1 << 1;
    }
}

impl WarningSet {
    /// Kebab-case names accepted on the command line.
    pub const NAMES: &'static [(&'static str, WarningSet)] = &[
        ("unused-node-type", WarningSet::UNUSED_NODE_TYPE),
        ("unparser-bad-grammar", WarningSet::UNPARSER_BAD_GRAMMAR),
    ];

    /// Look up a category by its kebab-case name.
    pub fn from_kebab_name(name: &str) -> Option<WarningSet> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, set)| *set)
    }
}

impl Default for WarningSet {
    fn default() -> Self {
        WarningSet::all()
    }
}
