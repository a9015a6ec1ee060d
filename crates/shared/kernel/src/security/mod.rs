pub mod resource;
pub mod token;
