use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "audit_entity_type", rename_all = "PascalCase")]
pub enum AuditEntityType {
    Partner,
    Client,
    Sale,
    CommissionPayment,
}

impl From<AuditEntityType> for &str {
    fn from(val: AuditEntityType) -> Self {
        match val {
            AuditEntityType::Partner => "Partner",
            AuditEntityType::Client => "Client",
            AuditEntityType::Sale => "Sale",
            AuditEntityType::CommissionPayment => "CommissionPayment",
        }
    }
}
