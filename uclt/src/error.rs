//! Error handling for the `ucl` CLI.
//!
//! Every variant maps to one of the fixed exit codes below; `main`
//! converts a top-level `Err` into that numeric status instead of the
//! default panic-on-unwrap behaviour.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("{0}")]
    Parse(#[from] ucl::ParseError),

    #[error("schema validation failed: {0}")]
    Validation(#[from] ucl::SchemaError),

    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("cannot create output file {0}: {1}")]
    CannotCreateOutput(PathBuf, #[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operating system error: {0}")]
    Os(String),
}

impl CliError {
    /// The process exit status this error should produce.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 64,
            CliError::Parse(_) | CliError::Validation(_) => 65,
            CliError::MissingInput(_) => 66,
            CliError::CannotCreateOutput(_, _) => 73,
            CliError::Io(_) => 74,
            CliError::Os(_) => 71,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_exits_64() {
        assert_eq!(CliError::Usage("bad flag".into()).exit_code(), 64);
    }

    #[test]
    fn missing_input_exits_66() {
        assert_eq!(CliError::MissingInput("x.conf".into()).exit_code(), 66);
    }

    #[test]
    fn io_error_exits_74() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(CliError::Io(io).exit_code(), 74);
    }
}
