//! Diagnostic system for grammar compilation passes.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (which combinator in the grammar)
//! - Notes (why it matters for the pass)
//!
//! # Fatal errors and warnings
//!
//! Passes report fatal conditions by returning an error value; the driver
//! emits it with [`DiagnosticQueue::emit_error`] and stops. Warnings are
//! recorded with [`DiagnosticQueue::warn_if`] and compilation continues.
//! Each warning belongs to a [`WarningSet`] category the user can disable.
//!
//! ```text
//! let guarantee = queue.emit_error(problem.into_diagnostic());
//! return Err(guarantee);
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
mod queue;
mod warnings;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
pub use warnings::WarningSet;
