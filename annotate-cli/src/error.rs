use colored::Colorize;
use std::fmt;
use std::process;

pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// Semantic map failed to load or parse.
    Map(annotate_map::MapError),
    /// Store transport or protocol error outside a variable run.
    Store(annotate_exec::StoreError),
    /// Bad file path, unreadable input, unwritable output.
    Input(String),
    /// Argument / usage errors.
    Usage(String),
    /// One or more variables failed; details were already printed.
    Failures(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Map(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Store(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Failures(count) => {
                write!(f, "{} {count} variable(s) failed", "error:".red().bold())
            }
        }
    }
}

impl From<annotate_map::MapError> for CliError {
    fn from(e: annotate_map::MapError) -> Self {
        CliError::Map(e)
    }
}

impl From<annotate_exec::StoreError> for CliError {
    fn from(e: annotate_exec::StoreError) -> Self {
        CliError::Store(e)
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Print the error and exit with the matching status code.
pub fn exit_with_error(error: CliError) -> ! {
    eprintln!("{error}");
    let code = match error {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}
