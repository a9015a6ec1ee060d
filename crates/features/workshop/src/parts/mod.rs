//! Parts taken from the inventory for a job.
pub(crate) mod handlers;
pub mod model;
pub(crate) mod repository;
