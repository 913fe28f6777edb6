use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commission_share::CommissionShareModel;
use crate::models::{Auditable, Identifiable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientModel {
    pub id: Uuid,
    /// Stored upper-cased
    pub name: HeaplessString<150>,
    /// Service sold to this client; copied onto every sale
    pub service: HeaplessString<50>,
    pub industry: Option<HeaplessString<150>>,
    pub contact: Option<HeaplessString<150>>,
    /// Sum of all share percentages, recomputed on every save
    pub total_commission_percentage: Decimal,
    /// Ordered by `slot_index`
    pub commission_shares: Vec<CommissionShareModel>,
    pub created_at: DateTime<Utc>,
    pub antecedent_hash: i64,
    pub antecedent_audit_log_id: Uuid,
    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl Identifiable for ClientModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for ClientModel {
    fn get_last_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
