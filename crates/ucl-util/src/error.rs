//! The crate-wide error taxonomy.
//!
//! Parsing and schema validation never panic or unwind on malformed input;
//! every fallible operation returns one of the two error types below. Both
//! carry a short human-readable message, capped at 128 bytes, plus, for
//! parser errors, the `Span` where the problem was found.

use crate::span::Span;
use thiserror::Error;

/// The fixed set of ways a parse can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParserErrorKind {
    /// Unexpected byte, unterminated literal, bad escape.
    Syntax,
    /// File open/read/mmap failure.
    Io,
    /// A parsing method was called on a parser already in the `ERROR` state.
    State,
    /// Comment or include nesting exceeded the configured depth.
    Nested,
    /// Unknown macro name, or a registered macro handler returned failure.
    Macro,
    /// An `.includes` signature was missing or did not verify.
    Ssl,
    /// A condition the parser never expects to reach.
    Internal,
}

impl ParserErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParserErrorKind::Syntax => "syntax",
            ParserErrorKind::Io => "io",
            ParserErrorKind::State => "state",
            ParserErrorKind::Nested => "nested",
            ParserErrorKind::Macro => "macro",
            ParserErrorKind::Ssl => "ssl",
            ParserErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ParserErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error produced by the chunk reader, lexer, or parser.
#[derive(Clone, Debug, Error)]
#[error("{kind}: {message} ({span:?})")]
pub struct ParseError {
    pub kind: ParserErrorKind,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParserErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::Syntax, message, span)
    }

    pub fn io(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::Io, message, span)
    }

    pub fn state(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::State, message, span)
    }

    pub fn nested(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::Nested, message, span)
    }

    pub fn macro_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::Macro, message, span)
    }

    pub fn ssl(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::Ssl, message, span)
    }

    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParserErrorKind::Internal, message, span)
    }
}

/// The fixed set of ways schema validation can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaErrorKind {
    /// The candidate's tag did not match any tag the schema requires.
    TypeMismatch,
    /// The schema document itself is malformed.
    InvalidSchema,
    /// A key listed in `required` is absent from the candidate object.
    MissingProperty,
    /// A size/range/uniqueness/pattern constraint was violated.
    Constraint,
    /// Reserved: a `dependencies` entry named a property that never appeared.
    MissingDependency,
}

impl SchemaErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SchemaErrorKind::TypeMismatch => "type-mismatch",
            SchemaErrorKind::InvalidSchema => "invalid-schema",
            SchemaErrorKind::MissingProperty => "missing-property",
            SchemaErrorKind::Constraint => "constraint",
            SchemaErrorKind::MissingDependency => "missing-dependency",
        }
    }
}

impl std::fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error produced by the schema validator.
///
/// `path` is the slash-separated location of the offending value within the
/// document being validated (e.g. `"servers/0/port"`), so a caller can point
/// a user at the right place without the validator knowing about spans.
#[derive(Clone, Debug, Error)]
#[error("{kind}: {message} (at {path})")]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
    pub path: String,
}

impl SchemaError {
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn type_mismatch(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::TypeMismatch, message, path)
    }

    pub fn invalid_schema(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::InvalidSchema, message, path)
    }

    pub fn missing_property(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::MissingProperty, message, path)
    }

    pub fn constraint(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::Constraint, message, path)
    }

    pub fn missing_dependency(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::MissingDependency, message, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_error_kind_as_str() {
        assert_eq!(ParserErrorKind::Syntax.as_str(), "syntax");
        assert_eq!(ParserErrorKind::Ssl.as_str(), "ssl");
    }

    #[test]
    fn schema_error_kind_as_str() {
        assert_eq!(SchemaErrorKind::TypeMismatch.as_str(), "type-mismatch");
        assert_eq!(SchemaErrorKind::MissingDependency.as_str(), "missing-dependency");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::syntax("unexpected '}'", Span::new(4, 5, 1, 5));
        let msg = err.to_string();
        assert!(msg.contains("syntax"));
        assert!(msg.contains("unexpected"));
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError::constraint("value below minimum", "servers/0/port");
        let msg = err.to_string();
        assert!(msg.contains("constraint"));
        assert!(msg.contains("servers/0/port"));
    }
}
