mod create_batch;
mod delete_by_sale_id;
mod find_by_filter;
mod find_by_sale_id;
mod repo_impl;

pub use repo_impl::CommissionRepositoryImpl;
