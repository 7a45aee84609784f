//! Child-process boundary.
//!
//! The orchestrator never spawns processes directly; it hands a [`CommandSpec`] to a [`ProcessRunner`].
//! [`SystemProcessRunner`] is the real implementation, and tests substitute a recording fake.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A fully resolved child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// What a finished child left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Launches child processes and waits for them.
///
/// An `Err` means the process could not be started at all; a process that ran and failed is an `Ok`
/// with a non-zero exit code.
pub trait ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput>;
}

/// Runs commands with [`std::process::Command`], capturing both output streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput> {
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Resolve the executable to launch.
///
/// An explicit override is used as given. Otherwise `name` is looked up on `PATH`; if that fails the
/// bare name is returned and the launch itself reports the problem.
pub fn resolve_program(name: &str, override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    match which::which(name) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(program = name, error = %err, "not found on PATH");
            PathBuf::from(name)
        }
    }
}
