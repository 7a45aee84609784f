//! Test model: properties, test definitions, and the registry that orders them.
//!
//! ## Modules
//!
//! - `property` - `PropertyBag`, ordered string-valued properties
//! - `test` - `TestDefinition`, a name + command + properties
//! - `registry` - `TestRegistry`, the ordered, name-unique collection a run renders

pub mod property;
pub mod registry;

pub use property::PropertyBag;
pub use registry::TestRegistry;
pub use test::TestDefinition;
