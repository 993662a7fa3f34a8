//! Pass configuration.

use lkc_diagnostic::WarningSet;

/// Whether unparsers are requested, and how strictly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnparseMode {
    /// Unparsers are not requested. Node types are still mapped to their
    /// producing parsers, but nothing is derived and no unparser-specific
    /// error is raised.
    Disabled,
    /// Unparsers are requested: top-level information loss is an error.
    #[default]
    Required,
    /// Unparsers are wanted if the grammar allows them: top-level
    /// information loss only disables generation.
    BestEffort,
}

/// Configuration of the unparser-derivation pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct UnparseConfig {
    pub mode: UnparseMode,
    /// Warning categories to report.
    pub warnings: WarningSet,
}

impl UnparseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: UnparseMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: WarningSet) -> Self {
        self.warnings = warnings;
        self
    }

    /// Initial value of the session's "generation enabled" flag.
    pub fn generation_requested(&self) -> bool {
        self.mode != UnparseMode::Disabled
    }

    /// Whether dropping information at the top of a rule is an error.
    pub fn rejects_top_level_loss(&self) -> bool {
        self.mode == UnparseMode::Required
    }
}
