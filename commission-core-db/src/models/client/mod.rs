pub mod client;
pub mod commission_share;

pub use client::ClientModel;
pub use commission_share::CommissionShareModel;
