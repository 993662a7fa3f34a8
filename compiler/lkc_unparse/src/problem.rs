//! Fatal problems raised while deriving unparsers.
//!
//! Problems describe what went wrong; [`UnparseProblem::into_diagnostic`]
//! renders them for the diagnostic queue. The first problem aborts the pass.

use lkc_diagnostic::{Diagnostic, ErrorCode};
use lkc_ir::Span;

/// A grammar construct the unparser derivation cannot handle, or two
/// occurrences of the same node type that disagree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnparseProblem {
    /// A node-building parser of a shape with no unparser counterpart.
    #[error("Unsupported parser for unparsers generation: {parser}")]
    UnsupportedParser { parser: String, span: Span },

    /// A token node built by something else than a transform of one token.
    #[error("Unsupported token node parser for unparsers generation: {parser}")]
    UnsupportedTokenNodeParser { parser: String, span: Span },

    /// A field parser of a shape with no field-unparser counterpart.
    #[error("Unsupported parser for node field: {parser}")]
    UnsupportedFieldParser { parser: String, span: Span },

    /// A parser whose result is discarded but that does not match a fixed
    /// run of tokens.
    #[error("Static sequence of tokens expected, but got: {parser}")]
    StaticTokensExpected { parser: String, span: Span },

    /// Two occurrences of the same token run disagree.
    #[error("Inconsistent {role}:\n  {left}\nand:\n  {right}")]
    InconsistentTokens {
        role: String,
        left: String,
        right: String,
    },

    /// Two occurrences of the same list node use different separators.
    #[error("Inconsistent separation token for {node}: {left} and {right}")]
    InconsistentSeparator {
        node: String,
        left: String,
        right: String,
    },

    /// A rule drops parsed elements at its root.
    #[error("Top-level information loss prevents unparsers generation")]
    TopLevelInformationLoss { rule: String, span: Span },

    /// An invariant that earlier passes should have established does not hold.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl UnparseProblem {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        UnparseProblem::Internal {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            UnparseProblem::UnsupportedParser { .. } => ErrorCode::E3001,
            UnparseProblem::UnsupportedTokenNodeParser { .. } => ErrorCode::E3002,
            UnparseProblem::UnsupportedFieldParser { .. } => ErrorCode::E3003,
            UnparseProblem::StaticTokensExpected { .. } => ErrorCode::E3004,
            UnparseProblem::InconsistentTokens { .. } => ErrorCode::E3005,
            UnparseProblem::InconsistentSeparator { .. } => ErrorCode::E3006,
            UnparseProblem::TopLevelInformationLoss { .. } => ErrorCode::E3007,
            UnparseProblem::Internal { .. } => ErrorCode::E9001,
        }
    }

    /// Location in the grammar, when the problem is tied to one parser.
    pub fn span(&self) -> Option<Span> {
        match self {
            UnparseProblem::UnsupportedParser { span, .. }
            | UnparseProblem::UnsupportedTokenNodeParser { span, .. }
            | UnparseProblem::UnsupportedFieldParser { span, .. }
            | UnparseProblem::StaticTokensExpected { span, .. }
            | UnparseProblem::TopLevelInformationLoss { span, .. } => Some(*span),
            UnparseProblem::InconsistentTokens { .. }
            | UnparseProblem::InconsistentSeparator { .. }
            | UnparseProblem::Internal { .. } => None,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.to_string());
        if let Some(span) = self.span() {
            diag = diag.with_label(span, self.label());
        }
        match &self {
            UnparseProblem::TopLevelInformationLoss { rule, .. } => diag.with_note(format!(
                "rule '{rule}' drops parsed elements other than a trailing termination token"
            )),
            UnparseProblem::InconsistentTokens { .. }
            | UnparseProblem::InconsistentSeparator { .. } => {
                diag.with_note("every rule producing a node type must use the same tokens")
            }
            UnparseProblem::Internal { .. } => {
                diag.with_note("this is a bug in the unparser generator")
            }
            _ => diag,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            UnparseProblem::StaticTokensExpected { .. } => "expected only tokens here",
            UnparseProblem::TopLevelInformationLoss { .. } => "elements dropped here",
            _ => "in this parser",
        }
    }
}
