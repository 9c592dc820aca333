//! ucl-util - Shared diagnostics, source locations, and error types.
//!
//! Every other crate in this workspace depends on the three things defined
//! here: a `Span`/`SourceMap` pair for byte-accurate source locations, a
//! `Diagnostic`/`Handler` pair for collecting human-readable errors and
//! warnings, and the crate-wide `ParseError`/`SchemaError` taxonomies that
//! the lexer, parser, and schema validator return from fallible operations.

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level, SourceSnippet};
pub use error::{ParseError, ParserErrorKind, SchemaError, SchemaErrorKind};
pub use span::{FileId, SourceFile, SourceMap, Span};

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
