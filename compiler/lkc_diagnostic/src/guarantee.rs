//! Proof that an error was reported.

use std::fmt;

/// Zero-sized proof that at least one error diagnostic was emitted.
///
/// Only [`DiagnosticQueue`](crate::DiagnosticQueue) hands these out, so a
/// pass returning `Err(ErrorGuaranteed)` cannot forget to report why it
/// failed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Proof for a non-zero error count, typically from a previous session.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
