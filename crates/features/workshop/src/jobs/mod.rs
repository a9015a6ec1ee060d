//! Service jobs: the work done for a service request.
pub(crate) mod handlers;
pub mod model;
pub mod repository;
