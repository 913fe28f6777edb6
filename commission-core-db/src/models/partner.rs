use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Auditable, Identifiable};

/// Commission partner (alianza): a third party entitled to a share of the
/// sales of the clients it is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerModel {
    pub id: Uuid,
    pub name: HeaplessString<150>,
    /// Exactly 10 digits when present
    pub phone: Option<HeaplessString<10>>,
    pub email: Option<HeaplessString<150>>,
    pub antecedent_hash: i64,
    pub antecedent_audit_log_id: Uuid,
    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for PartnerModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for PartnerModel {
    fn get_last_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
