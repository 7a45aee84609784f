//! Recognized CTest test-property vocabulary.
//!
//! This registry lists the test properties CTest documents for `set_tests_properties`. It is used for
//! **semantic hints only**: canonical spelling (matching is case-insensitive) and whether a value is a
//! `;`-separated list. Property names missing from this table are still valid and are forwarded verbatim,
//! since CTest owns the real schema and grows it between releases.
//!
//! ## Examples
//! ```rust
//! use ctestkit_core::properties::{self, PropertyId, PropertyKind};
//!
//! assert_eq!(properties::from_str("working_directory"), Some(PropertyId::WorkingDirectory));
//! assert_eq!(properties::info_for(PropertyId::Labels).kind, PropertyKind::List);
//! assert_eq!(properties::from_str("MY_CUSTOM_PROP"), None);
//! ```

/// Stable identifier for a recognized test property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    // Execution environment
    WorkingDirectory,
    Environment,
    EnvironmentModification,
    Timeout,
    TimeoutAfterMatch,

    // Scheduling
    RunSerial,
    Processors,
    ProcessorAffinity,
    Cost,
    ResourceLock,
    ResourceGroups,

    // Ordering and fixtures
    Depends,
    FixturesRequired,
    FixturesSetup,
    FixturesCleanup,

    // Outcome interpretation
    WillFail,
    Disabled,
    PassRegularExpression,
    FailRegularExpression,
    SkipRegularExpression,
    SkipReturnCode,

    // Reporting
    Labels,
    Measurement,
    AttachedFiles,
    AttachedFilesOnFail,
    RequiredFiles,
}

/// How a property value is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// A single free-form string.
    Scalar,
    /// A `;`-joined list; callers join items before storing.
    List,
    /// A CMake boolean (`ON`/`OFF`/`TRUE`/...).
    Bool,
    /// A number (seconds, counts, return codes).
    Number,
    /// A filesystem path.
    Path,
}

/// Metadata for one recognized property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    pub id: PropertyId,
    /// Upper-case spelling as CTest documents it.
    pub canonical: &'static str,
    pub kind: PropertyKind,
    pub summary: &'static str,
}

const fn info(id: PropertyId, canonical: &'static str, kind: PropertyKind, summary: &'static str) -> PropertyInfo {
    PropertyInfo {
        id,
        canonical,
        kind,
        summary,
    }
}

/// Registry of all recognized test properties.
pub const PROPERTIES: &[PropertyInfo] = &[
    info(
        PropertyId::WorkingDirectory,
        "WORKING_DIRECTORY",
        PropertyKind::Path,
        "Directory the test command runs in.",
    ),
    info(
        PropertyId::Environment,
        "ENVIRONMENT",
        PropertyKind::List,
        "NAME=value pairs set while the test runs.",
    ),
    info(
        PropertyId::EnvironmentModification,
        "ENVIRONMENT_MODIFICATION",
        PropertyKind::List,
        "NAME=op:value environment edits.",
    ),
    info(
        PropertyId::Timeout,
        "TIMEOUT",
        PropertyKind::Number,
        "Seconds before the test is killed.",
    ),
    info(
        PropertyId::TimeoutAfterMatch,
        "TIMEOUT_AFTER_MATCH",
        PropertyKind::List,
        "Shorten the timeout once output matches a regex.",
    ),
    info(
        PropertyId::RunSerial,
        "RUN_SERIAL",
        PropertyKind::Bool,
        "Never run this test in parallel with others.",
    ),
    info(
        PropertyId::Processors,
        "PROCESSORS",
        PropertyKind::Number,
        "Parallel slots the test occupies.",
    ),
    info(
        PropertyId::ProcessorAffinity,
        "PROCESSOR_AFFINITY",
        PropertyKind::Bool,
        "Pin the test to its processors.",
    ),
    info(PropertyId::Cost, "COST", PropertyKind::Number, "Scheduling weight."),
    info(
        PropertyId::ResourceLock,
        "RESOURCE_LOCK",
        PropertyKind::List,
        "Named resources the test holds exclusively.",
    ),
    info(
        PropertyId::ResourceGroups,
        "RESOURCE_GROUPS",
        PropertyKind::List,
        "Resource allocation specification.",
    ),
    info(
        PropertyId::Depends,
        "DEPENDS",
        PropertyKind::List,
        "Tests that must run first.",
    ),
    info(
        PropertyId::FixturesRequired,
        "FIXTURES_REQUIRED",
        PropertyKind::List,
        "Fixtures this test needs.",
    ),
    info(
        PropertyId::FixturesSetup,
        "FIXTURES_SETUP",
        PropertyKind::List,
        "Fixtures this test sets up.",
    ),
    info(
        PropertyId::FixturesCleanup,
        "FIXTURES_CLEANUP",
        PropertyKind::List,
        "Fixtures this test tears down.",
    ),
    info(
        PropertyId::WillFail,
        "WILL_FAIL",
        PropertyKind::Bool,
        "Invert the pass/fail result.",
    ),
    info(
        PropertyId::Disabled,
        "DISABLED",
        PropertyKind::Bool,
        "Register the test but never run it.",
    ),
    info(
        PropertyId::PassRegularExpression,
        "PASS_REGULAR_EXPRESSION",
        PropertyKind::List,
        "Output must match one of these to pass.",
    ),
    info(
        PropertyId::FailRegularExpression,
        "FAIL_REGULAR_EXPRESSION",
        PropertyKind::List,
        "Output matching any of these fails the test.",
    ),
    info(
        PropertyId::SkipRegularExpression,
        "SKIP_REGULAR_EXPRESSION",
        PropertyKind::List,
        "Output matching any of these marks the test skipped.",
    ),
    info(
        PropertyId::SkipReturnCode,
        "SKIP_RETURN_CODE",
        PropertyKind::Number,
        "Exit code that marks the test skipped.",
    ),
    info(
        PropertyId::Labels,
        "LABELS",
        PropertyKind::List,
        "Labels used for filtering and dashboard grouping.",
    ),
    info(
        PropertyId::Measurement,
        "MEASUREMENT",
        PropertyKind::Scalar,
        "Custom measurement reported to the dashboard.",
    ),
    info(
        PropertyId::AttachedFiles,
        "ATTACHED_FILES",
        PropertyKind::List,
        "Files uploaded with the test result.",
    ),
    info(
        PropertyId::AttachedFilesOnFail,
        "ATTACHED_FILES_ON_FAIL",
        PropertyKind::List,
        "Files uploaded when the test fails.",
    ),
    info(
        PropertyId::RequiredFiles,
        "REQUIRED_FILES",
        PropertyKind::List,
        "Files that must exist before the test runs.",
    ),
];

/// Resolve a spelling to a [`PropertyId`], ignoring ASCII case.
///
/// ## Returns
/// - `Some(PropertyId)` for a recognized property.
/// - `None` for anything else (which is still a legal property name).
pub fn from_str(name: &str) -> Option<PropertyId> {
    PROPERTIES
        .iter()
        .find(|p| p.canonical.eq_ignore_ascii_case(name))
        .map(|p| p.id)
}

/// Return the canonical spelling for a property.
pub fn as_str(id: PropertyId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a property.
pub fn info_for(id: PropertyId) -> &'static PropertyInfo {
    // Every variant has exactly one row; the guardrail tests pin this.
    match PROPERTIES.iter().find(|p| p.id == id) {
        Some(info) => info,
        None => unreachable!("property registry is missing {id:?}"),
    }
}

/// Canonicalize a property name: recognized names become their upper-case spelling, unknown names are
/// returned unchanged.
pub fn canonical_name(name: &str) -> String {
    match from_str(name) {
        Some(id) => as_str(id).to_string(),
        None => name.to_string(),
    }
}

/// Whether `name` is a recognized list-valued property.
pub fn is_list(name: &str) -> bool {
    from_str(name).is_some_and(|id| info_for(id).kind == PropertyKind::List)
}
