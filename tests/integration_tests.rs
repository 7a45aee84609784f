//! End-to-end tests for ctestkit
//!
//! These drive the public API the way an embedding program would: build a config and a registry, run the
//! orchestrator against a scratch binary directory, and inspect both the files on disk and the process
//! invocations recorded by a fake runner.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ctestkit::{
    CommandSpec, ConfigModel, CtestError, ProcessOutput, ProcessRunner, RunOrchestrator, RunState, TestDefinition,
    TestRegistry,
};
use ctestkit_core::parse_invocations;

/// Records every invocation and exits with a fixed code.
struct RecordingRunner {
    exit_code: i32,
    calls: RefCell<Vec<CommandSpec>>,
}

impl RecordingRunner {
    fn exiting(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput> {
        self.calls.borrow_mut().push(spec.clone());
        Ok(ProcessOutput {
            exit_code: Some(self.exit_code),
            stdout: "100% tests passed\n".to_string(),
            stderr: String::new(),
        })
    }
}

fn config_in(root: &Path) -> ConfigModel {
    let mut config = ConfigModel::new("Demo", root.join("src"), root.join("build"));
    config.ctest_command = Some(PathBuf::from("/opt/cmake/bin/ctest"));
    config
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_else(|e| panic!("reading {name}: {e}"))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn list_directory_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let mut registry = TestRegistry::new();
    registry
        .register(
            TestDefinition::with_properties("list_directory", ["ls", "/tmp"], [("WORKING_DIRECTORY", "/tmp")])
                .unwrap(),
        )
        .unwrap();

    let runner = RecordingRunner::exiting(0);
    let mut orchestrator = RunOrchestrator::with_runner(&config, &registry, runner);
    let outcome = orchestrator.run().unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout, "100% tests passed\n");
    assert_eq!(orchestrator.state(), RunState::Completed);

    let calls = orchestrator.runner().calls();
    assert_eq!(calls.len(), 1, "ctest is invoked exactly once");
    assert_eq!(calls[0].program, PathBuf::from("/opt/cmake/bin/ctest"));
    assert_eq!(calls[0].cwd, config.binary_dir);
    assert_eq!(calls[0].args, outcome.args);

    let test_file = read(&config.binary_dir, "CTestTestfile.cmake");
    let invocations = parse_invocations(&test_file).unwrap();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].name, "add_test");
    assert_eq!(invocations[0].args, vec!["list_directory", "ls", "/tmp"]);
    assert_eq!(invocations[1].name, "set_tests_properties");
    assert_eq!(
        invocations[1].args,
        vec!["list_directory", "PROPERTIES", "WORKING_DIRECTORY", "/tmp"]
    );

    for name in ["CTestConfig.cmake", "CTestCustom.cmake"] {
        assert!(config.binary_dir.join(name).is_file(), "{name} written");
    }
}

#[test]
fn failing_ctest_exit_code_is_passed_through() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let registry = TestRegistry::new();
    let mut orchestrator = RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(8));

    let outcome = orchestrator.run().unwrap();
    assert_eq!(outcome.exit_code, 8);
    assert!(!outcome.success());
    assert_eq!(orchestrator.state(), RunState::Completed);
}

#[test]
fn unregistered_test_is_absent_from_output() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let mut registry = TestRegistry::new();
    registry.register(TestDefinition::new("a", ["echo", "a"]).unwrap()).unwrap();
    registry.register(TestDefinition::new("b", ["echo", "b"]).unwrap()).unwrap();
    registry.unregister("a").unwrap();

    RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(0))
        .generate()
        .unwrap();

    let invocations = parse_invocations(&read(&config.binary_dir, "CTestTestfile.cmake")).unwrap();
    let declared: Vec<&str> = invocations
        .iter()
        .filter(|i| i.name == "add_test")
        .map(|i| i.args[0].as_str())
        .collect();
    assert_eq!(declared, vec!["b"]);
}

#[test]
fn relative_binary_dir_fails_before_any_io() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config_in(root.path());
    config.binary_dir = PathBuf::from("relative/build");
    let registry = TestRegistry::new();
    let runner = RecordingRunner::exiting(0);
    let mut orchestrator = RunOrchestrator::with_runner(&config, &registry, runner);

    let err = orchestrator.run().unwrap_err();
    assert!(matches!(err, CtestError::Validation(_)), "{err:?}");
    assert_eq!(orchestrator.state(), RunState::Failed);
    assert!(orchestrator.runner().calls().is_empty());
    assert!(!Path::new("relative").exists());
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn declarations_follow_registration_order() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let mut registry = TestRegistry::new();
    let names: Vec<String> = (0..25).map(|i| format!("test_{i:02}")).collect();
    for name in &names {
        registry.register(TestDefinition::new(name.as_str(), ["echo", name.as_str()]).unwrap()).unwrap();
    }

    RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(0))
        .generate()
        .unwrap();

    let invocations = parse_invocations(&read(&config.binary_dir, "CTestTestfile.cmake")).unwrap();
    let declared: Vec<&str> = invocations.iter().map(|i| i.args[0].as_str()).collect();
    assert_eq!(declared, names);
}

#[test]
fn empty_registry_still_produces_valid_test_file() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let registry = TestRegistry::new();

    let mut orchestrator = RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(0));
    orchestrator.run().unwrap();

    let text = read(&config.binary_dir, "CTestTestfile.cmake");
    assert!(text.starts_with('#'));
    assert!(parse_invocations(&text).unwrap().is_empty());
}

#[test]
fn replace_modifies_in_place_before_generation() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let mut registry = TestRegistry::new();
    for name in ["first", "second", "third"] {
        registry.register(TestDefinition::new(name, ["true"]).unwrap()).unwrap();
    }
    registry
        .replace("second", |props| {
            props.set_list("LABELS", ["slow", "network"]);
            Ok::<(), CtestError>(())
        })
        .unwrap();

    RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(0))
        .generate()
        .unwrap();

    let invocations = parse_invocations(&read(&config.binary_dir, "CTestTestfile.cmake")).unwrap();
    let summary: Vec<(String, String)> = invocations
        .iter()
        .map(|i| (i.name.clone(), i.args[0].clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("add_test".to_string(), "first".to_string()),
            ("add_test".to_string(), "second".to_string()),
            ("set_tests_properties".to_string(), "second".to_string()),
            ("add_test".to_string(), "third".to_string()),
        ]
    );
    assert_eq!(invocations[2].args[3], "slow;network");
}

#[test]
fn regeneration_overwrites_previous_files() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    let mut registry = TestRegistry::new();
    registry.register(TestDefinition::new("old", ["true"]).unwrap()).unwrap();
    RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(0))
        .generate()
        .unwrap();

    registry.unregister("old").unwrap();
    registry.register(TestDefinition::new("new", ["true"]).unwrap()).unwrap();
    RunOrchestrator::with_runner(&config, &registry, RecordingRunner::exiting(0))
        .generate()
        .unwrap();

    let text = read(&config.binary_dir, "CTestTestfile.cmake");
    assert!(text.contains("add_test(new "));
    assert!(!text.contains("add_test(old "));
    let entries = fs::read_dir(&config.binary_dir).unwrap().count();
    assert_eq!(entries, 3, "no temporary files left behind");
}
