//! Run configuration for one ctestkit invocation.
//!
//! `ConfigModel` is built once per run (defaults, then manifest, then CLI overrides or explicit
//! assignment) and is only read from the moment file generation starts. It is passed by reference to the
//! renderers and the orchestrator; there is no ambient global state.

use std::env;
use std::path::{Path, PathBuf};

use url::{Url, form_urlencoded};

use super::enums::{Mode, Model, Stage, Trigger};
use crate::error::{CtestError, CtestResult};

/// Default `CTEST_NIGHTLY_START_TIME`.
pub const DEFAULT_NIGHTLY_START_TIME: &str = "01:00:00 UTC";

/// Dashboard limits written to both `CTestConfig.cmake` and `CTestCustom.cmake`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomThresholds {
    pub max_errors: u32,
    pub max_warnings: u32,
    /// Bytes of output kept for passing tests.
    pub max_passed_test_output_size: u64,
    /// Regexes of paths excluded from coverage.
    pub coverage_exclude: Vec<String>,
}

impl Default for CustomThresholds {
    fn default() -> Self {
        Self {
            max_errors: 200,
            max_warnings: 300,
            max_passed_test_output_size: 104_857_600,
            coverage_exclude: Vec::new(),
        }
    }
}

/// Dashboard authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The token itself (`CTEST_TOKEN`).
    Value(String),
    /// A file whose first line is the token (`CTEST_TOKEN_FILE`).
    File(PathBuf),
}

/// A drop-site URL split into the pieces CTest wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropSite {
    pub method: String,
    /// Host, with `:port` when the URL names one.
    pub site: String,
    /// Path and query, e.g. `/submit.php?project=Foo`.
    pub location: String,
}

/// Global run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigModel {
    pub project_name: String,
    pub source_dir: PathBuf,
    pub binary_dir: PathBuf,
    pub site: String,
    /// Empty means "derive from project name and platform".
    pub build_name: String,
    pub model: Model,
    pub trigger: Trigger,
    /// Dashboard script to run with `ctest -S`; `None` runs the test file directly.
    pub mode: Option<Mode>,
    /// Explicit stage list for [`Mode::Stages`].
    pub stages: Vec<Stage>,
    /// `-j` level; 0 leaves it to ctest.
    pub jobs: u32,
    pub checkout_command: Option<String>,
    pub update_command: Option<String>,
    pub configure_command: Option<String>,
    pub build_command: Option<String>,
    pub coverage_command: Option<String>,
    pub memcheck_command: Option<String>,
    /// Submission URL, e.g. `https://cdash.example.org/submit.php?project=Foo`.
    pub drop_site: Option<String>,
    pub drop_site_cdash: bool,
    pub nightly_start_time: String,
    pub thresholds: CustomThresholds,
    pub notes_files: Vec<PathBuf>,
    pub pre_test_commands: Vec<String>,
    pub post_test_commands: Vec<String>,
    pub token: Option<Token>,
    /// Extra `set(NAME value)` lines for `CTestConfig.cmake`, in order.
    pub variables: Vec<(String, String)>,
    /// Pass-through arguments for the ctest invocation.
    pub arguments: Vec<String>,
    /// 0 = quiet, 1 = `-V`, 2+ = `-VV`.
    pub verbosity: u8,
    /// Run the CMake bootstrap before generating files.
    pub bootstrap: bool,
    pub cmake_command: Option<PathBuf>,
    pub ctest_command: Option<PathBuf>,
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            source_dir: PathBuf::new(),
            binary_dir: PathBuf::new(),
            site: default_site(),
            build_name: String::new(),
            model: Model::Continuous,
            trigger: Trigger::Test,
            mode: None,
            stages: Vec::new(),
            jobs: 1,
            checkout_command: None,
            update_command: None,
            configure_command: None,
            build_command: None,
            coverage_command: None,
            memcheck_command: None,
            drop_site: None,
            drop_site_cdash: true,
            nightly_start_time: DEFAULT_NIGHTLY_START_TIME.to_string(),
            thresholds: CustomThresholds::default(),
            notes_files: Vec::new(),
            pre_test_commands: Vec::new(),
            post_test_commands: Vec::new(),
            token: None,
            variables: Vec::new(),
            arguments: Vec::new(),
            verbosity: 0,
            bootstrap: false,
            cmake_command: None,
            ctest_command: None,
        }
    }
}

impl ConfigModel {
    /// Create a config with defaults for everything but the three required fields.
    pub fn new(project_name: impl Into<String>, source_dir: impl Into<PathBuf>, binary_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            source_dir: source_dir.into(),
            binary_dir: binary_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    pub fn with_build_name(mut self, name: impl Into<String>) -> Self {
        self.build_name = name.into();
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_drop_site(mut self, url: impl Into<String>) -> Self {
        self.drop_site = Some(url.into());
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Append a pass-through ctest argument.
    pub fn push_argument(&mut self, arg: impl Into<String>) {
        self.arguments.push(arg.into());
    }

    /// Set (or overwrite) an extra `CTestConfig.cmake` variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.variables.push((name, value)),
        }
    }

    /// Build name as written to the dashboard.
    pub fn effective_build_name(&self) -> String {
        if self.build_name.is_empty() {
            format!("[{}] [{} {}]", self.project_name, env::consts::OS, env::consts::ARCH)
        } else {
            self.build_name.clone()
        }
    }

    /// Stages the dashboard script runs, or an empty list when no mode is set.
    pub fn effective_stages(&self) -> Vec<Stage> {
        match self.mode {
            Some(Mode::Stages) => self.stages.clone(),
            Some(mode) => mode.default_stages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Split [`drop_site`](Self::drop_site) into method / site / location.
    ///
    /// A URL without a path submits to `/submit.php?project=<project>`, CDash's standard endpoint.
    ///
    /// ## Errors
    /// [`CtestError::Validation`] when the URL does not parse or has no host.
    pub fn drop_site(&self) -> CtestResult<Option<DropSite>> {
        let Some(raw) = self.drop_site.as_deref() else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|e| CtestError::validation(format!("drop site '{raw}': {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| CtestError::validation(format!("drop site '{raw}' has no host")))?;
        let site = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let location = if url.path() == "/" && url.query().is_none() {
            let project: String = form_urlencoded::byte_serialize(self.project_name.as_bytes()).collect();
            format!("/submit.php?project={project}")
        } else {
            match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            }
        };
        Ok(Some(DropSite {
            method: url.scheme().to_string(),
            site,
            location,
        }))
    }

    /// Check every invariant that must hold before any file is written.
    ///
    /// ## Errors
    /// [`CtestError::Validation`] naming the first offending field.
    pub fn validate(&self) -> CtestResult<()> {
        if self.project_name.trim().is_empty() {
            return Err(CtestError::validation("project name must not be empty"));
        }
        require_absolute("source directory", &self.source_dir)?;
        require_absolute("binary directory", &self.binary_dir)?;
        if self.mode == Some(Mode::Stages) && self.stages.is_empty() {
            return Err(CtestError::validation("mode 'Stages' needs at least one stage"));
        }
        for (name, _) in &self.variables {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(CtestError::validation(format!("invalid variable name '{name}'")));
            }
        }
        self.drop_site()?;
        Ok(())
    }

    /// Make relative source/binary directories absolute against `base`.
    ///
    /// Only the CLI calls this; library callers are expected to hand in absolute paths and get a
    /// validation error otherwise.
    pub fn resolve_paths(&mut self, base: &Path) {
        for dir in [&mut self.source_dir, &mut self.binary_dir] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    /// Fall back to `~/.tokens/<project>` when no token was given and that file exists.
    pub fn resolve_default_token(&mut self) {
        if self.token.is_some() || self.project_name.is_empty() {
            return;
        }
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let candidate = home.join(".tokens").join(&self.project_name);
        if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "using default CTEST_TOKEN_FILE");
            self.token = Some(Token::File(candidate));
        }
    }
}

fn require_absolute(what: &str, path: &Path) -> CtestResult<()> {
    if path.as_os_str().is_empty() {
        return Err(CtestError::validation(format!("{what} is not set")));
    }
    if !path.is_absolute() {
        return Err(CtestError::validation(format!(
            "{what} '{}' must be an absolute path",
            path.display()
        )));
    }
    Ok(())
}

fn default_site() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs(p: &str) -> PathBuf {
        env::temp_dir().join(p)
    }

    fn valid() -> ConfigModel {
        ConfigModel::new("Demo", abs("src"), abs("bin"))
    }

    #[test]
    fn test_defaults() {
        let config = ConfigModel::default();
        assert_eq!(config.model, Model::Continuous);
        assert_eq!(config.trigger, Trigger::Test);
        assert_eq!(config.thresholds.max_errors, 200);
        assert_eq!(config.thresholds.max_warnings, 300);
        assert_eq!(config.thresholds.max_passed_test_output_size, 104_857_600);
        assert_eq!(config.nightly_start_time, "01:00:00 UTC");
        assert_eq!(config.jobs, 1);
        assert!(config.mode.is_none());
    }

    #[test]
    fn test_validate_ok() {
        valid().validate().unwrap();
    }

    #[test]
    fn test_validate_relative_binary_dir() {
        let config = ConfigModel::new("Demo", abs("src"), "relative/bin");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CtestError::Validation(ref m) if m.contains("binary directory")));
    }

    #[test]
    fn test_validate_empty_project() {
        let config = ConfigModel::new("", abs("src"), abs("bin"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_stages_mode_needs_stages() {
        let mut config = valid().with_mode(Mode::Stages);
        assert!(config.validate().is_err());
        config.stages = vec![Stage::Test];
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_bad_variable_name() {
        let mut config = valid();
        config.set_variable("BAD NAME", "x");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = ConfigModel::new("Demo", "src", abs("bin"));
        let base = abs("base");
        config.resolve_paths(&base);
        assert_eq!(config.source_dir, base.join("src"));
        assert_eq!(config.binary_dir, abs("bin"));
    }

    #[test]
    fn test_drop_site_with_location() {
        let config = valid().with_drop_site("https://cdash.example.org/submit.php?project=Demo");
        let drop = config.drop_site().unwrap().unwrap();
        assert_eq!(drop.method, "https");
        assert_eq!(drop.site, "cdash.example.org");
        assert_eq!(drop.location, "/submit.php?project=Demo");
    }

    #[test]
    fn test_drop_site_defaults_location_and_keeps_port() {
        let config = valid().with_drop_site("http://localhost:8080");
        let drop = config.drop_site().unwrap().unwrap();
        assert_eq!(drop.method, "http");
        assert_eq!(drop.site, "localhost:8080");
        assert_eq!(drop.location, "/submit.php?project=Demo");
    }

    #[test]
    fn test_drop_site_default_location_encodes_project() {
        let mut config = valid().with_drop_site("https://cdash.example.org");
        config.project_name = "My Project&Co".to_string();
        let drop = config.drop_site().unwrap().unwrap();
        assert_eq!(drop.location, "/submit.php?project=My+Project%26Co");
    }

    #[test]
    fn test_drop_site_invalid() {
        let config = valid().with_drop_site("not a url");
        assert!(config.drop_site().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_build_name() {
        let config = valid();
        assert!(config.effective_build_name().starts_with("[Demo] ["));
        assert_eq!(valid().with_build_name("custom").effective_build_name(), "custom");
    }

    #[test]
    fn test_effective_stages() {
        assert!(valid().effective_stages().is_empty());
        assert_eq!(
            valid().with_mode(Mode::Coverage).effective_stages(),
            vec![Stage::Build, Stage::Test, Stage::Coverage]
        );
        let mut config = valid().with_mode(Mode::Stages);
        config.stages = vec![Stage::Test, Stage::Submit];
        assert_eq!(config.effective_stages(), vec![Stage::Test, Stage::Submit]);
    }

    #[test]
    fn test_set_variable_overwrites() {
        let mut config = valid();
        config.set_variable("A", "1");
        config.set_variable("B", "2");
        config.set_variable("A", "3");
        assert_eq!(
            config.variables,
            vec![("A".to_string(), "3".to_string()), ("B".to_string(), "2".to_string())]
        );
    }
}
