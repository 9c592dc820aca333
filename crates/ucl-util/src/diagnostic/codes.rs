//! Diagnostic codes for categorizing parser, lexer, and schema diagnostics.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings.
//!
//! # Examples
//!
//! ```
//! use ucl_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_LEXER_UNEXPECTED_CHAR;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E1001");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is typically "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
///
/// This allows users to reference specific diagnostics in documentation
/// and suppression attributes.
///
/// # Examples
///
/// ```
/// use ucl_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("E", 1001);
/// assert_eq!(code.as_str(), "E1001");
///
/// let warning = DiagnosticCode::W_DUPLICATE_KEY;
/// assert_eq!(warning.prefix(), "W");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E1001", "W4001")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // LEXER (E1xxx)
    // =========================================================================

    /// E1001: Unexpected byte outside any recognised character class.
    pub const E_LEXER_UNEXPECTED_CHAR: Self = Self::new("E", 1001);
    /// E1002: Unterminated quoted string or heredoc.
    pub const E_LEXER_UNTERMINATED_STRING: Self = Self::new("E", 1002);
    /// E1003: Malformed number literal (bad digit, bad suffix, overflow).
    pub const E_LEXER_INVALID_NUMBER: Self = Self::new("E", 1003);
    /// E1004: Block comment nesting exceeded the configured depth.
    pub const E_LEXER_COMMENT_TOO_DEEP: Self = Self::new("E", 1004);
    /// E1005: Invalid or incomplete `\u` escape.
    pub const E_LEXER_BAD_ESCAPE: Self = Self::new("E", 1005);

    // =========================================================================
    // PARSER (E2xxx)
    // =========================================================================

    /// E2001: A byte appeared where the parser state machine did not expect one.
    pub const E_PARSER_UNEXPECTED_TOKEN: Self = Self::new("E", 2001);
    /// E2002: End of input reached with open containers still on the stack.
    pub const E_PARSER_UNEXPECTED_EOF: Self = Self::new("E", 2002);
    /// E2003: A parsing method was called while the parser was already in ERROR.
    pub const E_PARSER_BAD_STATE: Self = Self::new("E", 2003);
    /// E2004: Include/chunk nesting exceeded the recursion ceiling.
    pub const E_PARSER_NESTED_TOO_DEEP: Self = Self::new("E", 2004);
    /// E2005: An unregistered macro name was invoked.
    pub const E_PARSER_UNKNOWN_MACRO: Self = Self::new("E", 2005);
    /// E2006: A registered macro handler returned failure.
    pub const E_PARSER_MACRO_FAILED: Self = Self::new("E", 2006);
    /// E2007: `.includes` signature was missing or did not verify.
    pub const E_PARSER_BAD_SIGNATURE: Self = Self::new("E", 2007);
    /// E2008: I/O failure opening or reading an included file.
    pub const E_PARSER_IO: Self = Self::new("E", 2008);

    // =========================================================================
    // SCHEMA (E3xxx)
    // =========================================================================

    /// E3001: Candidate tag does not match any tag the schema allows.
    pub const E_SCHEMA_TYPE_MISMATCH: Self = Self::new("E", 3001);
    /// E3002: The schema document itself is malformed.
    pub const E_SCHEMA_INVALID: Self = Self::new("E", 3002);
    /// E3003: A key listed in `required` is absent.
    pub const E_SCHEMA_MISSING_PROPERTY: Self = Self::new("E", 3003);
    /// E3004: A size/range/uniqueness/pattern constraint was violated.
    pub const E_SCHEMA_CONSTRAINT: Self = Self::new("E", 3004);

    // =========================================================================
    // WARNINGS (W4xxx)
    // =========================================================================

    /// W4001: A repeated object key was folded into an implicit array.
    pub const W_DUPLICATE_KEY: Self = Self::new("W", 4001);
    /// W4002: A referenced variable (`${NAME}`) had no registered value.
    pub const W_UNDEFINED_VARIABLE: Self = Self::new("W", 4002);
    /// W4003: A parser flag was set that has no effect in the current mode.
    pub const W_REDUNDANT_FLAG: Self = Self::new("W", 4003);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_code() {
        let code = DiagnosticCode::new("E", 1001);
        assert_eq!(code.prefix(), "E");
        assert_eq!(code.number(), 1001);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(DiagnosticCode::new("E", 1).as_str(), "E0001");
        assert_eq!(DiagnosticCode::new("W", 1).as_str(), "W0001");
        assert_eq!(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR.as_str(), "E1001");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", DiagnosticCode::E_PARSER_UNKNOWN_MACRO), "E2005");
    }

    #[test]
    fn test_debug() {
        assert_eq!(
            format!("{:?}", DiagnosticCode::E_SCHEMA_CONSTRAINT),
            "DiagnosticCode(E3004)"
        );
    }

    #[test]
    fn test_lexer_codes() {
        assert_eq!(DiagnosticCode::E_LEXER_UNTERMINATED_STRING.number(), 1002);
        assert_eq!(DiagnosticCode::E_LEXER_INVALID_NUMBER.number(), 1003);
    }

    #[test]
    fn test_parser_codes() {
        assert_eq!(DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN.prefix(), "E");
        assert_eq!(DiagnosticCode::E_PARSER_BAD_SIGNATURE.number(), 2007);
    }

    #[test]
    fn test_schema_codes() {
        assert_eq!(DiagnosticCode::E_SCHEMA_TYPE_MISMATCH.number(), 3001);
        assert_eq!(DiagnosticCode::E_SCHEMA_MISSING_PROPERTY.number(), 3003);
    }

    #[test]
    fn test_warning_codes() {
        assert_eq!(DiagnosticCode::W_DUPLICATE_KEY.prefix(), "W");
        assert_eq!(DiagnosticCode::W_UNDEFINED_VARIABLE.number(), 4002);
    }

    #[test]
    fn test_code_equality() {
        let code1 = DiagnosticCode::new("E", 1001);
        let code2 = DiagnosticCode::new("E", 1001);
        let code3 = DiagnosticCode::new("E", 1002);

        assert_eq!(code1, code2);
        assert_ne!(code1, code3);
    }
}
