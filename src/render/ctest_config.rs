//! `CTestConfig.cmake`: project identity, dashboard submission target, and limits.

use crate::config::{ConfigModel, Token};
use crate::error::CtestResult;

use super::writer::CMakeWriter;
use super::{header, CTEST_CONFIG_FILE};

/// Render `CTestConfig.cmake`.
///
/// ## Errors
/// [`CtestError::Validation`](crate::CtestError::Validation) if the drop-site URL cannot be split.
#[tracing::instrument(skip_all, fields(project = %config.project_name))]
pub fn render_ctest_config(config: &ConfigModel) -> CtestResult<String> {
    let mut w = CMakeWriter::new();
    header(&mut w, CTEST_CONFIG_FILE, config);

    w.set_var("CTEST_PROJECT_NAME", &config.project_name);
    w.set_var("CTEST_NIGHTLY_START_TIME", &config.nightly_start_time);
    if let Some(drop) = config.drop_site()? {
        w.newline();
        w.set_var("CTEST_DROP_METHOD", &drop.method);
        w.set_var("CTEST_DROP_SITE", &drop.site);
        w.set_var("CTEST_DROP_LOCATION", &drop.location);
        w.set_var("CTEST_DROP_SITE_CDASH", if config.drop_site_cdash { "TRUE" } else { "FALSE" });
    }

    w.newline();
    w.set_var("CTEST_SITE", &config.site);
    w.set_var("CTEST_BUILD_NAME", &config.effective_build_name());
    w.set_var("CTEST_MODEL", config.model.as_str());
    match &config.token {
        Some(Token::Value(token)) => w.set_var("CTEST_TOKEN", token),
        Some(Token::File(path)) => w.set_var("CTEST_TOKEN_FILE", &path.to_string_lossy()),
        None => {}
    }

    w.newline();
    let t = &config.thresholds;
    w.set_var("CTEST_CUSTOM_MAXIMUM_NUMBER_OF_ERRORS", &t.max_errors.to_string());
    w.set_var("CTEST_CUSTOM_MAXIMUM_NUMBER_OF_WARNINGS", &t.max_warnings.to_string());
    w.set_var(
        "CTEST_CUSTOM_MAXIMUM_PASSED_TEST_OUTPUT_SIZE",
        &t.max_passed_test_output_size.to_string(),
    );

    if !config.variables.is_empty() {
        w.newline();
        for (name, value) in &config.variables {
            w.set_var(name, value);
        }
    }

    Ok(w.finish())
}
