use chrono::{DateTime, NaiveDate, Utc};
use commission_core_api::{PaymentStatus, Period};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identifiable;

/// Commission line item: what one partner earns from one sale.
///
/// Rows are owned by their sale and rebuilt from scratch every time the sale
/// is saved, so they carry no audit chain of their own; `audit_log_id` points
/// at the sale save that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionModel {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub client_id: Uuid,
    /// Null once the partner has been deleted
    pub partner_id: Option<Uuid>,
    pub slot_index: i16,
    pub service_label: HeaplessString<50>,
    /// Share fraction, copied verbatim from the client profile
    pub percentage: Decimal,
    pub amount: Decimal,
    pub period_month: i32,
    pub period_year: i32,
    /// First day of the month following the sale
    pub release_eligible_from: NaiveDate,
    /// Whether the sale was paid when this row was generated
    pub is_released: bool,
    pub dispersion_status: PaymentStatus,
    pub dispersion_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub audit_log_id: Option<Uuid>,
}

impl CommissionModel {
    pub fn period(&self) -> Period {
        Period {
            year: self.period_year,
            month: self.period_month as u32,
        }
    }

    /// Released and past its release date.
    pub fn is_payable_on(&self, date: NaiveDate) -> bool {
        self.is_released && self.release_eligible_from <= date
    }
}

impl Identifiable for CommissionModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
