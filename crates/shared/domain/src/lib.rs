//! # Domain Models
//!
//! Plain AutoIMS types with a single dependency (`serde`): configuration,
//! workshop statuses, shared constants and the feature slice registry.
//! No I/O and no business logic here.

pub mod config;
pub mod constants;
pub mod registry;
pub mod status;
