pub mod engine;
pub mod models;
pub mod repository;
pub mod utils;

pub use models::*;
