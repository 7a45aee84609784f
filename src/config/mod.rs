//! Run configuration: the dashboard vocabulary, the [`ConfigModel`] itself, and JSON manifests.

pub mod enums;
pub mod manifest;
pub mod model;

pub use enums::{Mode, Model, Stage, Trigger};
pub use manifest::{ConfigOverrides, Manifest, TestSpec};
pub use model::{ConfigModel, CustomThresholds, DropSite, Token, DEFAULT_NIGHTLY_START_TIME};
