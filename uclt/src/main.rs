//! `ucl` — a command-line front end for the configuration-language library.
//!
//! Reads a document (file or stdin), optionally validates it against a
//! schema, and re-emits it in one of the four formats. There are no
//! subcommands, just flags.

mod error;

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use error::{CliError, Result};
use ucl::{Parser, ParserFlags};

/// `ucl` — parse, validate, and re-emit configuration-language documents.
#[derive(ClapParser, Debug)]
#[command(name = "ucl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse, validate, and re-emit ucl documents", long_about = None)]
struct Cli {
    /// Input file; reads standard input when omitted.
    #[arg(long = "in", value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file; writes standard output when omitted.
    #[arg(long = "out", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Schema document to validate the input against.
    #[arg(long, value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Ucl)]
    format: Format,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "UCL_VERBOSE")]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
enum Format {
    Ucl,
    Json,
    CompactJson,
    Yaml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("ucl: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let source = read_input(cli.input.as_deref())?;

    let mut parser = Parser::new(ParserFlags::empty());
    parser.add_string(&source)?;
    let root = parser
        .get_object()
        .ok_or_else(|| CliError::Usage("input produced no document".to_string()))?;

    if let Some(schema_path) = &cli.schema {
        let schema_source = read_input(Some(schema_path))?;
        let mut schema_parser = Parser::new(ParserFlags::empty());
        schema_parser.add_string(&schema_source)?;
        let schema = schema_parser
            .get_object()
            .ok_or_else(|| CliError::Usage("schema produced no document".to_string()))?;
        ucl::validate(&schema, &root)?;
    }

    let rendered = match cli.format {
        Format::Ucl => ucl::to_config(&root),
        Format::Json => ucl::to_json(&root),
        Format::CompactJson => ucl::to_json_compact(&root),
        Format::Yaml => ucl::to_yaml(&root),
    };

    write_output(cli.output.as_deref(), &rendered)
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    let mut buf = String::new();
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::MissingInput(path.to_path_buf()));
            }
            std::fs::File::open(path)?.read_to_string(&mut buf)?;
        }
        None => {
            std::io::stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(buf)
}

fn write_output(path: Option<&std::path::Path>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| CliError::CannotCreateOutput(path.to_path_buf(), e))?;
            file.write_all(rendered.as_bytes())?;
        }
        None => {
            std::io::stdout().write_all(rendered.as_bytes())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_long_flags() {
        let cli = Cli::parse_from([
            "ucl",
            "--in",
            "a.conf",
            "--out",
            "a.json",
            "--schema",
            "a.schema",
            "--format",
            "json",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("a.conf")));
        assert_eq!(cli.output, Some(PathBuf::from("a.json")));
        assert_eq!(cli.schema, Some(PathBuf::from("a.schema")));
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn format_defaults_to_ucl() {
        let cli = Cli::parse_from(["ucl"]);
        assert_eq!(cli.format, Format::Ucl);
    }

    #[test]
    fn compact_json_format_token_is_snake_case() {
        let cli = Cli::parse_from(["ucl", "--format", "compact_json"]);
        assert_eq!(cli.format, Format::CompactJson);
    }
}
