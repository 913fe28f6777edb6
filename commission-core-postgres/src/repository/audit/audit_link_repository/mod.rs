mod create;
mod find_by_audit_log_id;
mod repo_impl;

pub(crate) use create::insert_audit_link;
pub use repo_impl::AuditLinkRepositoryImpl;
