mod create_batch;
mod delete_batch;
mod find_by_client_id;
mod find_page_by_filter;
mod load_batch;
mod lock_for_update;
mod repo_impl;
mod update_batch;

pub use repo_impl::SaleRepositoryImpl;
