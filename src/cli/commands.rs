//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::env;
use std::io::{self, Write};
use std::path::Path;

use crate::config::{ConfigModel, Manifest, Token};
use crate::model::TestRegistry;
use crate::render::{render_ctest_config, render_ctest_custom, render_dashboard_script, render_test_file};
use crate::runner::workspace::{ensure_removable, remove_tree};
use crate::runner::RunOrchestrator;

use super::{CliError, CliResult, ConfigArgs, ExitCode, ShowFile};

// ============================================================================
// Configuration assembly (shared by every command)
// ============================================================================

/// Build the run configuration and registry from defaults, the manifest, then command-line flags.
///
/// Relative directories are resolved against `cwd`; missing source/binary directories default to it.
pub fn load_inputs(args: &ConfigArgs, cwd: &Path) -> CliResult<(ConfigModel, TestRegistry)> {
    let mut config = ConfigModel::default();
    let mut registry = TestRegistry::new();

    if let Some(path) = &args.manifest {
        let manifest = Manifest::load(&cwd.join(path))?;
        manifest.apply_to(&mut config);
        registry = manifest.to_registry()?;
    }

    apply_args(args, &mut config);

    if config.source_dir.as_os_str().is_empty() {
        config.source_dir = cwd.to_path_buf();
    }
    if config.binary_dir.as_os_str().is_empty() {
        config.binary_dir = cwd.to_path_buf();
    }
    config.resolve_paths(cwd);

    if config.project_name.is_empty() {
        if let Some(name) = config.source_dir.file_name() {
            config.project_name = name.to_string_lossy().into_owned();
        }
    }
    config.resolve_default_token();

    Ok((config, registry))
}

fn apply_args(args: &ConfigArgs, config: &mut ConfigModel) {
    if let Some(name) = &args.project_name {
        config.project_name = name.clone();
    }
    if let Some(dir) = &args.source_dir {
        config.source_dir = dir.clone();
    }
    if let Some(dir) = &args.binary_dir {
        config.binary_dir = dir.clone();
    }
    if let Some(site) = &args.site {
        config.site = site.clone();
    }
    if let Some(name) = &args.build_name {
        config.build_name = name.clone();
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(trigger) = args.trigger {
        config.trigger = trigger;
    }
    if let Some(mode) = args.mode {
        config.mode = Some(mode);
    }
    if !args.stages.is_empty() {
        config.stages = args.stages.clone();
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(token) = &args.token {
        config.token = Some(Token::Value(token.clone()));
    } else if let Some(file) = &args.token_file {
        config.token = Some(Token::File(file.clone()));
    }
    if let Some(url) = &args.drop_site {
        config.drop_site = Some(url.clone());
    }
    if args.bootstrap {
        config.bootstrap = true;
    }
    if args.verbose > 0 {
        config.verbosity = args.verbose;
    }
}

/// Delete the binary directory for `--clean-first`, unless that would take the sources or `cwd` with it.
fn clean_binary_dir(config: &ConfigModel, cwd: &Path) -> CliResult<()> {
    ensure_removable(&config.binary_dir, &[config.source_dir.as_path(), cwd])?;
    remove_tree(&config.binary_dir)?;
    Ok(())
}

/// Copy ctest's captured stdout to `out`. A closed pipe (`ctestkit run | head`) is not a failure.
fn forward_output(out: &mut impl Write, text: &str) -> CliResult<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(CliError::failure(format!("Error: cannot write ctest output: {err}"))),
    }
}

fn current_dir() -> CliResult<std::path::PathBuf> {
    env::current_dir().map_err(|e| CliError::failure(format!("Error: cannot read current directory: {e}")))
}

// ============================================================================
// Commands
// ============================================================================

/// `ctestkit run`: generate files, run ctest, and exit with ctest's exit code.
pub fn run_ctest(args: &ConfigArgs, clean_first: bool, ctest_args: Vec<String>) -> CliResult<ExitCode> {
    let cwd = current_dir()?;
    let (mut config, registry) = load_inputs(args, &cwd)?;
    config.arguments.extend(ctest_args);
    config.validate()?;
    if clean_first {
        clean_binary_dir(&config, &cwd)?;
    }

    let mut orchestrator = RunOrchestrator::new(&config, &registry);
    let outcome = orchestrator.run()?;

    forward_output(&mut io::stdout().lock(), &outcome.stdout)?;
    eprint!("{}", outcome.stderr);

    Ok(ExitCode(outcome.exit_code))
}

/// `ctestkit generate`: write the files and list them.
pub fn generate_files(args: &ConfigArgs, clean_first: bool) -> CliResult<ExitCode> {
    let cwd = current_dir()?;
    let (config, registry) = load_inputs(args, &cwd)?;
    config.validate()?;
    if clean_first {
        clean_binary_dir(&config, &cwd)?;
    }

    let mut orchestrator = RunOrchestrator::new(&config, &registry);
    for path in orchestrator.generate()? {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

/// `ctestkit show`: print one rendered file.
pub fn show_file(args: &ConfigArgs, file: ShowFile) -> CliResult<ExitCode> {
    let (config, registry) = load_inputs(args, &current_dir()?)?;
    print!("{}", render_one(&config, &registry, file)?);
    Ok(ExitCode::SUCCESS)
}

/// Render the file `show` asks for.
pub fn render_one(config: &ConfigModel, registry: &TestRegistry, file: ShowFile) -> CliResult<String> {
    config.validate()?;
    let text = match file {
        ShowFile::Config => render_ctest_config(config)?,
        ShowFile::Custom => render_ctest_custom(config),
        ShowFile::Tests => render_test_file(config, registry),
        ShowFile::Script => {
            let Some(mode) = config.mode else {
                return Err(CliError::failure("Error: `show script` requires --mode"));
            };
            render_dashboard_script(config, mode)
        }
    };
    Ok(text)
}
