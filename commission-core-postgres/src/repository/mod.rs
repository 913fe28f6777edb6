pub mod audit;
pub mod client_repository;
pub mod commission_payment_repository;
pub mod commission_repository;
pub mod db_init;
pub mod partner_repository;
pub mod sale_repository;

#[cfg(test)]
pub mod test_utils;

pub use audit::{AuditLinkRepositoryImpl, AuditLogRepositoryImpl};
pub use client_repository::ClientRepositoryImpl;
pub use commission_payment_repository::CommissionPaymentRepositoryImpl;
pub use commission_repository::CommissionRepositoryImpl;
pub use partner_repository::PartnerRepositoryImpl;
pub use sale_repository::SaleRepositoryImpl;
