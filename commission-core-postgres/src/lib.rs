pub mod postgres_repositories;
pub mod repository;
pub mod service;
pub mod utils;

pub use postgres_repositories::{CommissionRepositories, PostgresRepositories};
pub use postgres_unit_of_work::Executor;
pub use service::{
    ClientService, CommissionLedgerService, CommissionPaymentService, PartnerService, SaleService,
    SavedSale,
};

#[cfg(test)]
pub mod test_helper;
