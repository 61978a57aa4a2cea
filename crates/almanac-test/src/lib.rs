//! Almanac calendar assembly - integration test support.
//!
//! Re-exports the workspace crates so integration tests can reach every
//! layer through one dependency.

pub use almanac_core;
pub use almanac_rfc;
pub use almanac_service;
