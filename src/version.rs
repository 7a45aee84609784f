//! ctestkit version information.
//!
//! The version is stamped into the header of every generated file and printed by `--version`, so both
//! read it from this one constant.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The ctestkit version string (for example, `0.1.0`).
pub const CTESTKIT_VERSION: &str = env!("CARGO_PKG_VERSION");
