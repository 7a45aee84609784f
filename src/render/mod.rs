//! CTest file generation.
//!
//! Rendering is pure: each renderer turns a [`ConfigModel`] (and, for the test file, a [`TestRegistry`])
//! into a `String` without touching the filesystem. [`write_generated`] is the only place that writes,
//! and it replaces files atomically.
//!
//! ## Modules
//!
//! - `writer` - `CMakeWriter`, indentation and quoting for CMake source
//! - `ctest_config` - `CTestConfig.cmake`
//! - `ctest_custom` - `CTestCustom.cmake`
//! - `test_file` - `CTestTestfile.cmake`
//! - `dashboard` - `<Mode>.cmake` dashboard scripts for `ctest -S`

pub mod ctest_config;
pub mod ctest_custom;
pub mod dashboard;
pub mod test_file;
pub mod writer;

use std::io::Write;
use std::path::{Path, PathBuf};

pub use ctest_config::render_ctest_config;
pub use ctest_custom::render_ctest_custom;
pub use dashboard::render_dashboard_script;
pub use test_file::render_test_file;
pub use writer::CMakeWriter;

use crate::config::ConfigModel;
use crate::error::{CtestError, CtestResult};
use crate::model::TestRegistry;
use crate::version::CTESTKIT_VERSION;

pub const CTEST_CONFIG_FILE: &str = "CTestConfig.cmake";
pub const CTEST_CUSTOM_FILE: &str = "CTestCustom.cmake";
pub const CTEST_TEST_FILE: &str = "CTestTestfile.cmake";

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

impl GeneratedFile {
    fn new(name: impl Into<String>, contents: String) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }
}

/// Render every file a run needs: the three CTest files, plus the dashboard script when a mode is set.
///
/// ## Errors
/// [`CtestError::Validation`] if the configuration cannot be rendered (an unparseable drop site) or a test
/// has a property with an empty name.
pub fn render_all(config: &ConfigModel, registry: &TestRegistry) -> CtestResult<Vec<GeneratedFile>> {
    registry.validate()?;
    let mut files = vec![
        GeneratedFile::new(CTEST_CONFIG_FILE, render_ctest_config(config)?),
        GeneratedFile::new(CTEST_CUSTOM_FILE, render_ctest_custom(config)),
        GeneratedFile::new(CTEST_TEST_FILE, render_test_file(config, registry)),
    ];
    if let Some(mode) = config.mode {
        files.push(GeneratedFile::new(
            mode.script_name(),
            render_dashboard_script(config, mode),
        ));
    }
    Ok(files)
}

/// Write `contents` to `dir/file_name` atomically.
///
/// The text goes to a temporary file in `dir` first and is then renamed over the target, so readers see
/// either the previous file or the complete new one.
///
/// ## Errors
/// [`CtestError::Write`] with the target path if any step fails.
pub fn write_generated(dir: &Path, file_name: &str, contents: &str) -> CtestResult<PathBuf> {
    let path = dir.join(file_name);
    let write_err = |source| CtestError::Write {
        path: path.clone(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    temp.write_all(contents.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(&path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote generated file");
    Ok(path)
}

/// Common header for every generated file. Deliberately free of timestamps so output is reproducible.
fn header(w: &mut CMakeWriter, file_name: &str, config: &ConfigModel) {
    w.comment(&format!(
        "{file_name} generated by ctestkit {CTESTKIT_VERSION}. Do not edit.\n\nproject: {}\nsource:  {}\nbinary:  {}",
        config.project_name,
        config.source_dir.display(),
        config.binary_dir.display(),
    ));
    w.newline();
}
