pub(crate) mod handlers;
pub mod model;
pub mod repository;
