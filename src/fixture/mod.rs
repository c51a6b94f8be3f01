//! Fixture Registry
//!
//! Fixtures pair a source text with the diagnostics a linter is expected to
//! report for it. The registry holds them and checks a linter against all of
//! them in one pass.

pub mod annotations;
pub mod loader;
pub mod registry;
pub mod schema;

pub use registry::{FixtureRegistry, RegistryError};
pub use schema::{ExpectedDef, Fixture, FixtureDef, FixtureFile};
