pub mod audit;
pub mod auditable;
pub mod client;
pub mod commission;
pub mod identifiable;
pub mod partner;
pub mod sale;

// Re-exports
pub use audit::*;
pub use auditable::*;
pub use client::*;
pub use commission::*;
pub use identifiable::*;
pub use partner::*;
pub use sale::*;
