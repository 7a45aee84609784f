//! Run orchestration: bootstrap, file generation, ctest execution.
//!
//! A [`RunOrchestrator`] drives one run through
//! `Idle → Configuring → FileGeneration → Executing → Completed`, or to `Failed` from any stage. Each
//! stage starts only after the previous one succeeded, so generated files never exist without a
//! successful bootstrap (when one was requested) and ctest never runs against stale files.
//!
//! ## Modules
//!
//! - `process` - the `ProcessRunner` seam and its `std::process` implementation
//! - `bootstrap` - the stub `CMakeLists.txt` and `cmake .` invocation
//! - `workspace` - binary-directory creation and removal
//!
//! ## Notes
//! - A non-zero ctest exit code is a normal outcome, returned in [`RunOutcome::exit_code`]. Only a
//!   ctest that cannot be launched, or that dies from a signal, is an error.
//! - There are no timeouts. A [`CancelToken`] is checked between stages and before each child is
//!   launched; a child that has started is always waited for.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod bootstrap;
pub mod process;
pub mod workspace;

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ctestkit_core::join_list;

pub use process::{CommandSpec, ProcessOutput, ProcessRunner, SystemProcessRunner};

use crate::config::{ConfigModel, Mode};
use crate::error::{CtestError, CtestResult};
use crate::model::TestRegistry;
use crate::render::{render_all, write_generated};

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    Configuring,
    FileGeneration,
    Executing,
    Completed,
    Failed,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Configuring => "configuring",
            RunState::FileGeneration => "generating files",
            RunState::Executing => "executing",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        }
    }

    /// Whether the run has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a run that reached ctest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// ctest's exit code, unmodified.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The arguments ctest was invoked with.
    pub args: Vec<String>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Cross-thread cancellation flag.
///
/// Clones share the flag, so a caller can keep one clone and hand another to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives one run for a configuration and a registry.
///
/// Both inputs are borrowed immutably for the orchestrator's lifetime; nothing is mutated after file
/// generation starts.
pub struct RunOrchestrator<'a, R: ProcessRunner = SystemProcessRunner> {
    config: &'a ConfigModel,
    registry: &'a TestRegistry,
    runner: R,
    cancel: CancelToken,
    state: RunState,
}

impl<'a> RunOrchestrator<'a, SystemProcessRunner> {
    /// Orchestrator that launches real `cmake` / `ctest` processes.
    pub fn new(config: &'a ConfigModel, registry: &'a TestRegistry) -> Self {
        Self::with_runner(config, registry, SystemProcessRunner)
    }
}

impl<'a, R: ProcessRunner> RunOrchestrator<'a, R> {
    pub fn with_runner(config: &'a ConfigModel, registry: &'a TestRegistry, runner: R) -> Self {
        Self {
            config,
            registry,
            runner,
            cancel: CancelToken::new(),
            state: RunState::Idle,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// State after the most recent call to [`run`](Self::run) or [`generate`](Self::generate).
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run every stage: optional bootstrap, file generation, then ctest.
    ///
    /// ## Errors
    /// - [`CtestError::Validation`] before any I/O if the configuration is invalid
    /// - [`CtestError::Bootstrap`] if the requested bootstrap fails
    /// - [`CtestError::Write`] if a generated file cannot be written
    /// - [`CtestError::Execution`] if ctest cannot be launched or is killed
    /// - [`CtestError::Cancelled`] if the cancel token was set between stages
    ///
    /// On any error [`state`](Self::state) is [`RunState::Failed`].
    #[tracing::instrument(skip_all, fields(project = %self.config.project_name, tests = self.registry.len()))]
    pub fn run(&mut self) -> CtestResult<RunOutcome> {
        self.state = RunState::Idle;
        let result = self.run_stages();
        self.finish(result)
    }

    /// Validate and write the generated files without bootstrapping or running ctest.
    ///
    /// ## Errors
    /// As [`run`](Self::run), minus the bootstrap and execution errors.
    #[tracing::instrument(skip_all, fields(project = %self.config.project_name, tests = self.registry.len()))]
    pub fn generate(&mut self) -> CtestResult<Vec<PathBuf>> {
        self.state = RunState::Idle;
        let result = self.config.validate().and_then(|()| {
            workspace::ensure_dir(&self.config.binary_dir)?;
            self.generate_files()
        });
        self.finish(result)
    }

    fn finish<T>(&mut self, result: CtestResult<T>) -> CtestResult<T> {
        match &result {
            Ok(_) => {
                self.state = RunState::Completed;
                tracing::info!("run completed");
            }
            Err(err) => {
                tracing::warn!(stage = %self.state, error = %err, "run failed");
                self.state = RunState::Failed;
            }
        }
        result
    }

    fn run_stages(&mut self) -> CtestResult<RunOutcome> {
        self.config.validate()?;

        self.enter(RunState::Configuring)?;
        workspace::ensure_dir(&self.config.binary_dir)?;
        if self.config.bootstrap {
            self.check_cancelled()?;
            bootstrap::bootstrap(self.config, &self.runner)?;
        }

        self.enter(RunState::FileGeneration)?;
        self.generate_files()?;

        self.enter(RunState::Executing)?;
        self.execute()
    }

    /// Move to `next`, unless cancellation was requested.
    fn enter(&mut self, next: RunState) -> CtestResult<()> {
        self.check_cancelled()?;
        tracing::debug!(from = %self.state, to = %next, "stage transition");
        self.state = next;
        Ok(())
    }

    fn check_cancelled(&self) -> CtestResult<()> {
        if self.cancel.is_cancelled() {
            return Err(CtestError::Cancelled { state: self.state });
        }
        Ok(())
    }

    fn generate_files(&mut self) -> CtestResult<Vec<PathBuf>> {
        self.state = RunState::FileGeneration;
        let files = render_all(self.config, self.registry)?;
        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            written.push(write_generated(&self.config.binary_dir, &file.name, &file.contents)?);
        }
        tracing::info!(
            dir = %self.config.binary_dir.display(),
            files = written.len(),
            "generated ctest files"
        );
        Ok(written)
    }

    fn execute(&mut self) -> CtestResult<RunOutcome> {
        let program = process::resolve_program("ctest", self.config.ctest_command.as_deref());
        let args = self.compose_args();
        let spec = CommandSpec::new(program, &self.config.binary_dir).args(args.iter().cloned());

        self.check_cancelled()?;
        tracing::info!(command = %spec, "running ctest");
        let output = self.runner.run(&spec).map_err(|err| CtestError::Execution {
            program: spec.program.display().to_string(),
            reason: err.to_string(),
            stderr: String::new(),
        })?;

        let Some(exit_code) = output.exit_code else {
            return Err(CtestError::Execution {
                program: spec.program.display().to_string(),
                reason: "terminated by signal".to_string(),
                stderr: output.stderr,
            });
        };
        tracing::info!(exit_code, "ctest finished");
        Ok(RunOutcome {
            exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            args,
        })
    }

    /// The ctest argument vector for this configuration.
    ///
    /// Order: verbosity flag, dashboard-script arguments (`-DSTAGES=...` then `-S <script>`), `-j<N>`,
    /// pass-through arguments, and finally `--test-dir <binary_dir>` when no dashboard script runs.
    pub fn compose_args(&self) -> Vec<String> {
        let config = self.config;
        let mut args = Vec::new();
        match config.verbosity {
            0 => {}
            1 => args.push("-V".to_string()),
            _ => args.push("-VV".to_string()),
        }
        if let Some(mode) = config.mode {
            if mode == Mode::Stages {
                args.push(format!(
                    "-DSTAGES={}",
                    join_list(config.stages.iter().map(|s| s.as_str()))
                ));
            }
            args.push("-S".to_string());
            args.push(config.binary_dir.join(mode.script_name()).display().to_string());
        }
        if config.jobs > 0 {
            args.push(format!("-j{}", config.jobs));
        }
        args.extend(config.arguments.iter().cloned());
        if config.mode.is_none() {
            args.push("--test-dir".to_string());
            args.push(config.binary_dir.display().to_string());
        }
        args
    }
}
