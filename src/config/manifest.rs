//! JSON run manifests.
//!
//! A manifest lets the CLI drive a complete run without an embedding program:
//!
//! ```json
//! {
//!   "config": { "project_name": "Demo", "model": "Nightly", "jobs": 4 },
//!   "tests": [
//!     { "name": "list_directory", "command": ["ls", "/tmp"], "properties": { "TIMEOUT": 30 } }
//!   ]
//! }
//! ```
//!
//! Every `config` field is optional and overrides the corresponding [`ConfigModel`] default. Unknown
//! fields are rejected so typos do not silently fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::enums::{Mode, Model, Stage, Trigger};
use super::model::{ConfigModel, Token};
use crate::error::{CtestError, CtestResult};
use crate::model::{PropertyBag, TestDefinition, TestRegistry};

/// Parsed manifest document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub config: ConfigOverrides,
    #[serde(default)]
    pub tests: Vec<TestSpec>,
}

/// One entry of the manifest's `tests` array.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSpec {
    pub name: String,
    pub command: Vec<String>,
    #[serde(default)]
    pub properties: PropertyBag,
}

/// Optional overrides for [`ConfigModel`] fields.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub project_name: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub binary_dir: Option<PathBuf>,
    pub site: Option<String>,
    pub build_name: Option<String>,
    pub model: Option<Model>,
    pub trigger: Option<Trigger>,
    pub mode: Option<Mode>,
    pub stages: Option<Vec<Stage>>,
    pub jobs: Option<u32>,
    pub checkout_command: Option<String>,
    pub update_command: Option<String>,
    pub configure_command: Option<String>,
    pub build_command: Option<String>,
    pub coverage_command: Option<String>,
    pub memcheck_command: Option<String>,
    pub drop_site: Option<String>,
    pub drop_site_cdash: Option<bool>,
    pub nightly_start_time: Option<String>,
    pub max_errors: Option<u32>,
    pub max_warnings: Option<u32>,
    pub max_passed_test_output_size: Option<u64>,
    pub coverage_exclude: Option<Vec<String>>,
    pub notes_files: Option<Vec<PathBuf>>,
    pub pre_test_commands: Option<Vec<String>>,
    pub post_test_commands: Option<Vec<String>>,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    /// Extra `set()` variables, applied in document order.
    pub variables: Option<PropertyBag>,
    pub arguments: Option<Vec<String>>,
    pub bootstrap: Option<bool>,
    pub cmake_command: Option<PathBuf>,
    pub ctest_command: Option<PathBuf>,
}

impl Manifest {
    /// Read and parse a manifest file.
    ///
    /// ## Errors
    /// [`CtestError::Io`] if the file cannot be read, [`CtestError::Manifest`] if it is not a valid manifest.
    pub fn load(path: &Path) -> CtestResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| CtestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|message| CtestError::Manifest {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse manifest text. The error is the serde message, which carries line and column.
    pub fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Apply the `config` section on top of `config`.
    pub fn apply_to(&self, config: &mut ConfigModel) {
        self.config.apply_to(config);
    }

    /// Build a registry from the `tests` section, in document order.
    ///
    /// ## Errors
    /// [`CtestError::Validation`] for an unusable test, [`CtestError::DuplicateName`] for a repeated name.
    pub fn to_registry(&self) -> CtestResult<TestRegistry> {
        let mut registry = TestRegistry::new();
        for spec in &self.tests {
            let mut test = TestDefinition::new(spec.name.clone(), spec.command.iter().cloned())?;
            test.properties_mut().merge(&spec.properties);
            registry.register(test)?;
        }
        Ok(registry)
    }
}

macro_rules! override_fields {
    ($src:ident => $dst:ident: $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$src.$field {
                $dst.$field = value.clone();
            }
        )+
    };
}

macro_rules! override_optional_fields {
    ($src:ident => $dst:ident: $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$src.$field {
                $dst.$field = Some(value.clone());
            }
        )+
    };
}

impl ConfigOverrides {
    pub fn apply_to(&self, config: &mut ConfigModel) {
        override_fields!(self => config:
            project_name, source_dir, binary_dir, site, build_name, model, trigger, stages, jobs,
            drop_site_cdash, nightly_start_time, notes_files, pre_test_commands, post_test_commands,
            arguments, bootstrap,
        );
        override_optional_fields!(self => config:
            mode, checkout_command, update_command, configure_command, build_command, coverage_command,
            memcheck_command, drop_site, cmake_command, ctest_command,
        );

        let thresholds = &mut config.thresholds;
        if let Some(value) = self.max_errors {
            thresholds.max_errors = value;
        }
        if let Some(value) = self.max_warnings {
            thresholds.max_warnings = value;
        }
        if let Some(value) = self.max_passed_test_output_size {
            thresholds.max_passed_test_output_size = value;
        }
        if let Some(value) = &self.coverage_exclude {
            thresholds.coverage_exclude = value.clone();
        }

        // An explicit token wins over a token file.
        if let Some(file) = &self.token_file {
            config.token = Some(Token::File(file.clone()));
        }
        if let Some(token) = &self.token {
            config.token = Some(Token::Value(token.clone()));
        }

        if let Some(variables) = &self.variables {
            for (name, value) in variables.iter() {
                config.set_variable(name, value);
            }
        }
    }
}
