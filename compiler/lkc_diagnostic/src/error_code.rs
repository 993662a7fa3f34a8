//! Error codes for grammar compilation diagnostics.
//!
//! Format: `E####` for errors and `W####` for warnings. The first digit is
//! the pass:
//! - E3xxx / W3xxx: unparser derivation
//! - E9xxx: internal compiler errors

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Unparser Errors (E3xxx)
    /// Combinator shape that cannot be turned into a node unparser
    E3001,
    /// Token node built by something else than a single-token transform
    E3002,
    /// Combinator shape that cannot be turned into a field unparser
    E3003,
    /// Static sequence of tokens expected
    E3004,
    /// Inconsistent token sequences between two occurrences
    E3005,
    /// Inconsistent list separators between two occurrences
    E3006,
    /// Top-level rule drops parsed information
    E3007,

    // Internal Errors (E9xxx)
    /// Internal compiler error (invariant violation)
    E9001,

    // Warnings
    /// Concrete node type with no parser
    W3001,
    /// Grammar too irregular for automatic unparsers
    W3002,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E3007,
        ErrorCode::E9001,
        ErrorCode::W3001,
        ErrorCode::W3002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E9001 => "E9001",
            ErrorCode::W3001 => "W3001",
            ErrorCode::W3002 => "W3002",
        }
    }

    /// One-line description, used by `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E3001 => "unsupported parser for unparsers generation",
            ErrorCode::E3002 => "unsupported token node parser for unparsers generation",
            ErrorCode::E3003 => "unsupported parser for node field",
            ErrorCode::E3004 => "static sequence of tokens expected",
            ErrorCode::E3005 => "inconsistent token sequences",
            ErrorCode::E3006 => "inconsistent separation token",
            ErrorCode::E3007 => "top-level information loss prevents unparsers generation",
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::W3001 => "node type has no parser",
            ErrorCode::W3002 => "grammar prevents automatic unparser generation",
        }
    }

    /// Check if this is an unparser error (E3xxx range).
    pub fn is_unparser_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E3001
                | ErrorCode::E3002
                | ErrorCode::E3003
                | ErrorCode::E3004
                | ErrorCode::E3005
                | ErrorCode::E3006
                | ErrorCode::E3007
        )
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }

    /// Check if this is a warning code (Wxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W3001 | ErrorCode::W3002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E3005"` or `"w3001"`.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
