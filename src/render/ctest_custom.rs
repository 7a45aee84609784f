//! `CTestCustom.cmake`: dashboard limits, coverage excludes, pre/post-test hooks, and notes.

use crate::config::ConfigModel;

use super::writer::CMakeWriter;
use super::{header, CTEST_CUSTOM_FILE};

/// Render `CTestCustom.cmake`.
///
/// Empty lists are omitted rather than written as `set(X "")`, so CTest's own defaults stay in effect.
#[tracing::instrument(skip_all, fields(project = %config.project_name))]
pub fn render_ctest_custom(config: &ConfigModel) -> String {
    let mut w = CMakeWriter::new();
    header(&mut w, CTEST_CUSTOM_FILE, config);

    let t = &config.thresholds;
    w.set_var("CTEST_CUSTOM_MAXIMUM_NUMBER_OF_ERRORS", &t.max_errors.to_string());
    w.set_var("CTEST_CUSTOM_MAXIMUM_NUMBER_OF_WARNINGS", &t.max_warnings.to_string());
    w.set_var(
        "CTEST_CUSTOM_MAXIMUM_PASSED_TEST_OUTPUT_SIZE",
        &t.max_passed_test_output_size.to_string(),
    );

    let lists: [(&str, Vec<String>); 4] = [
        ("CTEST_CUSTOM_COVERAGE_EXCLUDE", t.coverage_exclude.clone()),
        ("CTEST_CUSTOM_PRE_TEST", config.pre_test_commands.clone()),
        ("CTEST_CUSTOM_POST_TEST", config.post_test_commands.clone()),
        (
            "CTEST_NOTES_FILES",
            config
                .notes_files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        ),
    ];
    for (name, items) in lists.iter().filter(|(_, items)| !items.is_empty()) {
        w.set_list(name, items);
    }

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_only_thresholds() {
        let config = ConfigModel::new("Demo", "/s", "/b");
        let text = render_ctest_custom(&config);
        let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('#') && !l.is_empty()).collect();
        assert_eq!(
            body,
            vec![
                "set(CTEST_CUSTOM_MAXIMUM_NUMBER_OF_ERRORS \"200\")",
                "set(CTEST_CUSTOM_MAXIMUM_NUMBER_OF_WARNINGS \"300\")",
                "set(CTEST_CUSTOM_MAXIMUM_PASSED_TEST_OUTPUT_SIZE \"104857600\")",
            ]
        );
    }

    #[test]
    fn test_lists_emitted_when_present() {
        let mut config = ConfigModel::new("Demo", "/s", "/b");
        config.thresholds.coverage_exclude = vec!["/usr/.*".into(), ".*/test/.*".into()];
        config.pre_test_commands = vec!["echo start".into()];
        config.notes_files = vec!["/b/notes.txt".into()];
        let text = render_ctest_custom(&config);
        assert!(text.contains("set(CTEST_CUSTOM_COVERAGE_EXCLUDE \"/usr/.*;.*/test/.*\")\n"));
        assert!(text.contains("set(CTEST_CUSTOM_PRE_TEST \"echo start\")\n"));
        assert!(text.contains("set(CTEST_NOTES_FILES \"/b/notes.txt\")\n"));
        assert!(!text.contains("CTEST_CUSTOM_POST_TEST"));
    }
}
