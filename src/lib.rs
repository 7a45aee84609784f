#![forbid(unsafe_code)]
//! ctestkit: declarative CTest test registries, CTest file generation, and ctest run orchestration.
//!
//! Describe tests ([`TestDefinition`] in a [`TestRegistry`]) and a run ([`ConfigModel`]), then let a
//! [`RunOrchestrator`] write `CTestConfig.cmake`, `CTestCustom.cmake`, and `CTestTestfile.cmake` into the
//! binary directory and invoke `ctest` there. ctest's exit code and output come back in a [`RunOutcome`].
//!
//! ```rust,no_run
//! use ctestkit::{ConfigModel, RunOrchestrator, TestDefinition, TestRegistry};
//!
//! # fn main() -> ctestkit::CtestResult<()> {
//! let config = ConfigModel::new("Demo", "/work/demo", "/work/demo/build");
//! let mut registry = TestRegistry::new();
//! registry.register(TestDefinition::with_properties(
//!     "list_directory",
//!     ["ls", "/tmp"],
//!     [("WORKING_DIRECTORY", "/tmp")],
//! )?)?;
//!
//! let outcome = RunOrchestrator::new(&config, &registry).run()?;
//! std::process::exit(outcome.exit_code);
//! # }
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `runner` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod runner;
pub mod version;

pub use config::{ConfigModel, CustomThresholds, Manifest, Mode, Model, Stage, Token, Trigger};
pub use error::{CtestError, CtestResult};
pub use model::{PropertyBag, TestDefinition, TestRegistry};
pub use render::{
    GeneratedFile, render_all, render_ctest_config, render_ctest_custom, render_dashboard_script, render_test_file,
    write_generated,
};
pub use runner::{CancelToken, CommandSpec, ProcessOutput, ProcessRunner, RunOrchestrator, RunOutcome, RunState};
pub use version::CTESTKIT_VERSION;
