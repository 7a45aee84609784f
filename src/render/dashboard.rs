//! `<Mode>.cmake`: the dashboard script `ctest -S` runs when a dashboard mode is selected.
//!
//! The script includes the generated `CTestConfig.cmake`, starts a dashboard of the configured model,
//! walks the `STAGES` list (overridable with `-DSTAGES=...`), and submits after the trigger stage.
//! It ends with `FATAL_ERROR` when tests failed so ctest's exit code reflects the test result.

use crate::config::{ConfigModel, Mode, Stage, Trigger};

use super::writer::CMakeWriter;
use super::{header, CTEST_CONFIG_FILE};

const SUBMIT: &str = "ctest_submit(${SUBMIT_ARGS})";

/// Render the dashboard script for `mode`.
#[tracing::instrument(skip_all, fields(mode = %mode))]
pub fn render_dashboard_script(config: &ConfigModel, mode: Mode) -> String {
    let mut w = CMakeWriter::new();
    header(&mut w, &mode.script_name(), config);

    w.command("cmake_minimum_required", ["VERSION", "3.10"]);
    w.command(
        "include",
        [format!("\"${{CMAKE_CURRENT_LIST_DIR}}/{CTEST_CONFIG_FILE}\"")],
    );
    w.newline();

    w.set_var("CTEST_SOURCE_DIRECTORY", &config.source_dir.to_string_lossy());
    w.set_var("CTEST_BINARY_DIRECTORY", &config.binary_dir.to_string_lossy());
    let commands = [
        ("CTEST_CHECKOUT_COMMAND", &config.checkout_command),
        ("CTEST_UPDATE_COMMAND", &config.update_command),
        ("CTEST_CONFIGURE_COMMAND", &config.configure_command),
        ("CTEST_BUILD_COMMAND", &config.build_command),
        ("CTEST_COVERAGE_COMMAND", &config.coverage_command),
        ("CTEST_MEMORYCHECK_COMMAND", &config.memcheck_command),
    ];
    for (name, value) in commands {
        if let Some(value) = value {
            w.set_var(name, value);
        }
    }
    w.newline();

    let default_stages = match mode {
        Mode::Stages => config.stages.clone(),
        other => other.default_stages().to_vec(),
    };
    w.begin_block("if(NOT DEFINED STAGES)");
    w.set_list("STAGES", default_stages.iter().map(|s| s.as_str()));
    w.end_block("endif()");
    w.newline();

    write_submit_args(&mut w);
    w.newline();

    w.command("ctest_start", [config.model.as_str()]);
    w.set_var("TEST_RESULT", "0");
    w.begin_block("foreach(STAGE ${STAGES})");
    for (i, stage) in Stage::ALL.iter().enumerate() {
        let test = format!("(STAGE STREQUAL \"{stage}\")");
        if i == 0 {
            w.begin_block(&format!("if{test}"));
        } else {
            w.block_separator(&format!("elseif{test}"));
        }
        write_stage(&mut w, config, *stage);
    }
    w.end_block("endif()");

    match config.trigger.stage() {
        Some(stage) if config.trigger != Trigger::Submit => {
            w.begin_block(&format!("if(STAGE STREQUAL \"{stage}\")"));
            w.writeln(SUBMIT);
            w.end_block("endif()");
        }
        _ => {}
    }
    w.end_block("endforeach()");

    if config.trigger == Trigger::Submit {
        w.begin_block("if(NOT \"Submit\" IN_LIST STAGES)");
        w.writeln(SUBMIT);
        w.end_block("endif()");
    }
    w.newline();

    w.begin_block("if(NOT TEST_RESULT EQUAL 0)");
    w.writeln("message(FATAL_ERROR \"tests failed (${TEST_RESULT})\")");
    w.end_block("endif()");

    w.finish()
}

/// `SUBMIT_ARGS` carries the bearer token header when one is available.
fn write_submit_args(w: &mut CMakeWriter) {
    w.begin_block("if(DEFINED CTEST_TOKEN_FILE AND NOT DEFINED CTEST_TOKEN)");
    w.writeln("file(STRINGS \"${CTEST_TOKEN_FILE}\" CTEST_TOKEN LIMIT_COUNT 1)");
    w.end_block("endif()");
    w.set_var("SUBMIT_ARGS", "");
    w.begin_block("if(DEFINED CTEST_TOKEN)");
    w.writeln("set(SUBMIT_ARGS HTTPHEADER \"Authorization: Bearer ${CTEST_TOKEN}\")");
    w.end_block("endif()");
}

fn write_stage(w: &mut CMakeWriter, config: &ConfigModel, stage: Stage) {
    match stage {
        Stage::Build => {
            if config.update_command.is_some() {
                w.writeln("ctest_update()");
            }
            if config.configure_command.is_some() {
                w.writeln("ctest_configure()");
            }
            if config.build_command.is_some() {
                w.writeln("ctest_build()");
            }
            if config.update_command.is_none() && config.configure_command.is_none() && config.build_command.is_none()
            {
                w.writeln("message(STATUS \"no build commands configured\")");
            }
        }
        Stage::Test => {
            if config.jobs > 0 {
                w.writeln(&format!(
                    "ctest_test(RETURN_VALUE TEST_RESULT PARALLEL_LEVEL {})",
                    config.jobs
                ));
            } else {
                w.writeln("ctest_test(RETURN_VALUE TEST_RESULT)");
            }
        }
        Stage::Coverage => w.writeln("ctest_coverage()"),
        Stage::MemCheck => w.writeln("ctest_memcheck()"),
        Stage::Submit => w.writeln(SUBMIT),
    }
}
