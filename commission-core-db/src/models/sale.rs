use chrono::NaiveDate;
use commission_core_api::{PaymentStatus, Period};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Auditable, Identifiable};

/// One billed transaction against a client.
///
/// `service_label`, `commission_rate` and `commission_amount` are derived
/// from the client on every save and are never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleModel {
    pub id: Uuid,
    pub client_id: Uuid,
    pub sale_date: NaiveDate,
    pub sale_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub service_label: HeaplessString<50>,
    pub invoicing_company: Option<HeaplessString<100>>,
    pub invoice_number: Option<HeaplessString<100>>,
    pub comments: Option<HeaplessString<255>>,
    /// Client total as a fraction, 4 decimal places
    pub commission_rate: Decimal,
    /// `commission_rate * sale_amount`, 2 decimal places
    pub commission_amount: Decimal,
    pub antecedent_hash: i64,
    pub antecedent_audit_log_id: Uuid,
    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl SaleModel {
    pub fn period(&self) -> Period {
        Period::of(self.sale_date)
    }
}

impl Identifiable for SaleModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for SaleModel {
    fn get_last_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
