//! `CTestTestfile.cmake`: one `add_test` per registered test, plus its properties.

use ctestkit_core::quote_argument;

use crate::config::ConfigModel;
use crate::model::{TestDefinition, TestRegistry};

use super::writer::CMakeWriter;
use super::{header, CTEST_TEST_FILE};

/// Render `CTestTestfile.cmake` for every test in `registry`, in registration order.
///
/// Every command argument is quoted, the executable included, so the vector CTest runs is exactly the
/// registered one. Property names and values are quoted as well; list values keep their `;` separators.
///
/// An empty registry yields a header-only file, which CTest accepts.
#[tracing::instrument(skip_all, fields(tests = registry.len()))]
pub fn render_test_file(config: &ConfigModel, registry: &TestRegistry) -> String {
    let mut w = CMakeWriter::new();
    header(&mut w, CTEST_TEST_FILE, config);
    for test in registry.iter() {
        write_test(&mut w, test);
    }
    w.finish()
}

fn write_test(w: &mut CMakeWriter, test: &TestDefinition) {
    let mut args = vec![test.name().to_string()];
    args.extend(test.command().iter().map(|a| quote_argument(a)));
    w.command("add_test", args);

    if test.properties().is_empty() {
        return;
    }
    let mut args = vec![test.name().to_string(), "PROPERTIES".to_string()];
    for (key, value) in test.properties().iter() {
        args.push(quote_argument(key));
        args.push(quote_argument(value));
    }
    w.command("set_tests_properties", args);
}
