pub mod audit_entity_type;
pub mod audit_link;
pub mod audit_log;

pub use audit_entity_type::AuditEntityType;
pub use audit_link::AuditLinkModel;
pub use audit_log::AuditLogModel;
