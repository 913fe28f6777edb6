mod create;
mod load_batch;
mod repo_impl;

pub use repo_impl::AuditLogRepositoryImpl;
