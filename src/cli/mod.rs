//! CLI module for ctestkit
//!
//! This module provides the `ctestkit` command-line interface.
//!
//! ## Commands
//!
//! - `run [OPTIONS] [-- <CTEST_ARGS>...]` - Generate the CTest files and run ctest
//! - `generate [OPTIONS]` - Generate the CTest files only
//! - `show <config|custom|tests|script> [OPTIONS]` - Print one rendered file
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{Mode, Model, Stage, Trigger};
use crate::error::CtestError;
use crate::version::CTESTKIT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Library errors are rendered through miette so codes and help text reach the user.
impl From<CtestError> for CliError {
    fn from(err: CtestError) -> Self {
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate CTest files from a declarative test list and run ctest
#[derive(Parser, Debug)]
#[command(name = "ctestkit")]
#[command(version = CTESTKIT_VERSION)]
#[command(about = "Generate CTest files from a declarative test list and run ctest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the CTest files, then run ctest in the binary directory
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        /// Remove the binary directory before doing anything else
        #[arg(long)]
        clean_first: bool,
        /// Arguments passed to ctest unchanged
        #[arg(last = true, value_name = "CTEST_ARGS")]
        ctest_args: Vec<String>,
    },

    /// Generate the CTest files without running ctest
    Generate {
        #[command(flatten)]
        config: ConfigArgs,
        /// Remove the binary directory before generating
        #[arg(long)]
        clean_first: bool,
    },

    /// Print one rendered file to stdout
    Show {
        /// Which file to print
        #[arg(value_enum)]
        file: ShowFile,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Files `show` can print.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFile {
    /// CTestConfig.cmake
    Config,
    /// CTestCustom.cmake
    Custom,
    /// CTestTestfile.cmake
    Tests,
    /// The <Mode>.cmake dashboard script (requires --mode)
    Script,
}

/// Options shared by every subcommand. Each one overrides the manifest value.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// JSON manifest with configuration and tests
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
    /// Project name (default: source directory name)
    #[arg(long, value_name = "NAME")]
    pub project_name: Option<String>,
    /// Source directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,
    /// Binary directory the files are generated into (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub binary_dir: Option<PathBuf>,
    /// Site name reported to the dashboard
    #[arg(long)]
    pub site: Option<String>,
    /// Build name reported to the dashboard
    #[arg(long)]
    pub build_name: Option<String>,
    /// Dashboard model: Nightly, Continuous, or Experimental
    #[arg(long)]
    pub model: Option<Model>,
    /// Stage after which results are submitted
    #[arg(long)]
    pub trigger: Option<Trigger>,
    /// Run a dashboard script (`ctest -S <MODE>.cmake`)
    #[arg(long)]
    pub mode: Option<Mode>,
    /// Stages for --mode Stages, comma separated
    #[arg(long, value_delimiter = ',')]
    pub stages: Vec<Stage>,
    /// Parallel test jobs (0 leaves it to ctest)
    #[arg(short = 'j', long)]
    pub jobs: Option<u32>,
    /// Dashboard authentication token
    #[arg(long, conflicts_with = "token_file")]
    pub token: Option<String>,
    /// File containing the dashboard authentication token
    #[arg(long, value_name = "FILE")]
    pub token_file: Option<PathBuf>,
    /// Submission URL, e.g. https://my.cdash.org/submit.php?project=Foo
    #[arg(long, value_name = "URL")]
    pub drop_site: Option<String>,
    /// Write a stub CMakeLists.txt if needed and run `cmake .` first
    #[arg(long)]
    pub bootstrap: bool,
    /// Increase ctest verbosity (-v for -V, -vv for -VV)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            config,
            clean_first,
            ctest_args,
        } => commands::run_ctest(&config, clean_first, ctest_args),
        Command::Generate { config, clean_first } => commands::generate_files(&config, clean_first),
        Command::Show { file, config } => commands::show_file(&config, file),
    }
}

// ============================================================================
// Tests
// ============================================================================
