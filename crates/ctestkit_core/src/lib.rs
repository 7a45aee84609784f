//! Provide shared, pure CMake/CTest vocabulary and syntax helpers for ctestkit.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic helpers that both:
//! - the renderers use to emit `CTestTestfile.cmake` / `CTestConfig.cmake` / `CTestCustom.cmake`, and
//! - the tests use to re-read what was emitted with a parser that shares no code with the emitter.
//!
//! ## Notes
//!
//! - This is a “vocabulary core” crate: **no IO**, no global state, no knowledge of registries or configs.
//! - Current scope: the recognized test-property registry, CMake argument quoting, boolean-literal
//!   classification, `;`-list joining, and a small command-invocation tokenizer.

pub mod properties;
pub mod syntax;

pub use properties::{PropertyId, PropertyInfo, PropertyKind};
pub use syntax::{Invocation, SyntaxError, is_bool_literal, join_list, parse_invocations, quote_argument, truthy};
