pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use domain::*;
pub use error::*;
