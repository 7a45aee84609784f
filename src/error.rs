//! Error taxonomy shared by the registry, renderers, and run orchestrator.
//!
//! Every failure carries enough context (test name, file path, child exit code, captured stderr) to be
//! diagnosed without re-running in verbose mode. Nothing here is retried or swallowed.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::runner::RunState;

/// Errors produced by ctestkit operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CtestError {
    #[error("test '{name}' is already registered")]
    #[diagnostic(
        code(ctestkit::duplicate_name),
        help("unregister the existing test first, or use `replace` to modify its properties")
    )]
    DuplicateName { name: String },

    #[error("no test named '{name}' is registered")]
    #[diagnostic(code(ctestkit::not_found))]
    NotFound { name: String },

    #[error("property '{key}' is not set")]
    #[diagnostic(code(ctestkit::key_not_found))]
    KeyNotFound { key: String },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(ctestkit::validation))]
    Validation(String),

    #[error("failed to write {}: {source}", .path.display())]
    #[diagnostic(code(ctestkit::write), help("check that the binary directory exists and is writable"))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("build-system bootstrap failed ({}){}", describe_exit(.exit_code), stderr_suffix(.stderr))]
    #[diagnostic(code(ctestkit::bootstrap))]
    Bootstrap { exit_code: Option<i32>, stderr: String },

    #[error("failed to run {program}: {reason}{}", stderr_suffix(.stderr))]
    #[diagnostic(code(ctestkit::execution), help("check that the program is installed and on PATH, or pass an explicit path"))]
    Execution {
        program: String,
        reason: String,
        stderr: String,
    },

    #[error("run cancelled while {state}")]
    #[diagnostic(code(ctestkit::cancelled))]
    Cancelled { state: RunState },

    #[error("invalid manifest {}: {message}", .path.display())]
    #[diagnostic(code(ctestkit::manifest))]
    Manifest { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    #[diagnostic(code(ctestkit::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for ctestkit operations.
pub type CtestResult<T> = Result<T, CtestError>;

impl CtestError {
    /// Shorthand for a [`CtestError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        CtestError::Validation(message.into())
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}
