use chrono::{DateTime, NaiveDate, Utc};
use commission_core_api::Period;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Auditable, Identifiable};

/// A payout actually made to a partner for a period.
///
/// Payments are not linked to individual line items; balances are only
/// reconciled in aggregate per partner and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionPaymentModel {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub period_month: i32,
    pub period_year: i32,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub comment: Option<HeaplessString<255>>,
    pub created_at: DateTime<Utc>,
    pub antecedent_hash: i64,
    pub antecedent_audit_log_id: Uuid,
    pub hash: i64,
    pub audit_log_id: Option<Uuid>,
}

impl CommissionPaymentModel {
    pub fn period(&self) -> Period {
        Period {
            year: self.period_year,
            month: self.period_month as u32,
        }
    }
}

impl Identifiable for CommissionPaymentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for CommissionPaymentModel {
    fn get_last_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
