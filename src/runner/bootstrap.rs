//! Build-system bootstrap: make the binary directory a configured CMake tree.
//!
//! `ctest` only runs in a directory CMake has configured. When asked to, the orchestrator writes a minimal
//! `CMakeLists.txt` (unless one is already there) and runs `cmake .` in the binary directory before any
//! CTest file is generated.

use ctestkit_core::quote_argument;

use super::process::{resolve_program, CommandSpec, ProcessRunner};
use crate::config::ConfigModel;
use crate::error::{CtestError, CtestResult};
use crate::render::{write_generated, CMakeWriter};

pub const CMAKE_LISTS_FILE: &str = "CMakeLists.txt";

/// The stub project file. No languages are enabled, so no compiler is probed.
pub fn render_stub(project_name: &str) -> String {
    let mut w = CMakeWriter::new();
    w.command("cmake_minimum_required", ["VERSION", "3.10"]);
    w.command("project", [quote_argument(project_name), "LANGUAGES".into(), "NONE".into()]);
    w.writeln("enable_testing()");
    w.command("include", ["CTest"]);
    w.finish()
}

/// Write the stub if needed, then run `cmake .` in the binary directory.
///
/// ## Errors
/// [`CtestError::Write`] if the stub cannot be written, [`CtestError::Bootstrap`] if CMake cannot be
/// launched or exits unsuccessfully.
#[tracing::instrument(skip_all, fields(binary_dir = %config.binary_dir.display()))]
pub fn bootstrap<R: ProcessRunner>(config: &ConfigModel, runner: &R) -> CtestResult<()> {
    let lists = config.binary_dir.join(CMAKE_LISTS_FILE);
    if lists.exists() {
        tracing::debug!(path = %lists.display(), "keeping existing CMakeLists.txt");
    } else {
        write_generated(&config.binary_dir, CMAKE_LISTS_FILE, &render_stub(&config.project_name))?;
    }

    let program = resolve_program("cmake", config.cmake_command.as_deref());
    let spec = CommandSpec::new(program, &config.binary_dir).arg(".");
    tracing::info!(command = %spec, "bootstrapping build tree");

    let output = runner.run(&spec).map_err(|err| CtestError::Bootstrap {
        exit_code: None,
        stderr: format!("could not launch {}: {err}", spec.program.display()),
    })?;
    if !output.success() {
        return Err(CtestError::Bootstrap {
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ctestkit_core::parse_invocations;

    use super::*;

    #[test]
    fn test_stub_contents() {
        let stub = render_stub("My Project");
        let calls = parse_invocations(&stub).unwrap();
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cmake_minimum_required", "project", "enable_testing", "include"]);
        assert_eq!(calls[1].args, vec!["My Project", "LANGUAGES", "NONE"]);
        assert_eq!(calls[3].args, vec!["CTest"]);
    }
}
