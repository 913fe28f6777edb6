mod create_batch;
mod delete_batch;
mod find_all;
mod load_batch;
mod repo_impl;
mod update_batch;

pub use repo_impl::ClientRepositoryImpl;
