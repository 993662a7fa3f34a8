//! Diagnostic queue for collecting grammar pass diagnostics.
//!
//! Features:
//! - Emission order is preserved (passes walk the grammar deterministically)
//! - Error limits to prevent overwhelming output
//! - Deduplication of identical diagnostics
//! - Warning categories gated by a [`WarningSet`]
//! - `ErrorGuaranteed` proof that errors were emitted

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed, WarningSet};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting diagnostics in emission order.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.warn_if(config.warnings, WarningSet::UNUSED_NODE_TYPE, unused, || diag);
/// let reported = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    warning_count: usize,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if is_error && self.config.error_limit > 0 && self.error_count >= self.config.error_limit
        {
            return false;
        }

        if self.config.deduplicate && self.diagnostics.contains(&diag) {
            return false;
        }

        if is_error {
            self.error_count += 1;
        } else if diag.is_warning() {
            self.warning_count += 1;
        }

        tracing::debug!(
            code = %diag.code,
            severity = %diag.severity,
            text = %diag.message,
            "diagnostic queued"
        );
        self.diagnostics.push(diag);
        true
    }

    /// Emit a warning when `cond` holds and `category` is enabled in `enabled`.
    ///
    /// The diagnostic is built lazily so disabled categories cost nothing.
    /// Returns `true` if a warning was queued.
    pub fn warn_if(
        &mut self,
        enabled: WarningSet,
        category: WarningSet,
        cond: bool,
        diag: impl FnOnce() -> Diagnostic,
    ) -> bool {
        if !cond || !enabled.contains(category) {
            return false;
        }
        self.add(diag())
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// The returned `ErrorGuaranteed` can only be obtained through the queue.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a non-error");
        self.add(diag);
        ErrorGuaranteed::new()
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Number of queued diagnostics carrying `code`.
    pub fn count_code(&self, code: ErrorCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    /// Return queued diagnostics in emission order and clear the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        self.warning_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
