use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payment_status::PaymentStatus;
use super::period::Period;

/// Query over commission line items. Empty criteria match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionFilter {
    pub partner_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub period: Option<Period>,
    /// Only line items generated from a paid sale.
    #[serde(default)]
    pub released_only: bool,
    /// Only released line items whose release date is on or before this day.
    pub payable_as_of: Option<NaiveDate>,
}

impl CommissionFilter {
    pub fn for_partner(partner_id: Uuid) -> Self {
        Self {
            partner_id: Some(partner_id),
            ..Self::default()
        }
    }

    pub fn in_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn released(mut self) -> Self {
        self.released_only = true;
        self
    }

    pub fn payable_as_of(mut self, date: NaiveDate) -> Self {
        self.payable_as_of = Some(date);
        self
    }
}

/// Query over recorded commission payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFilter {
    pub partner_id: Option<Uuid>,
    pub period: Option<Period>,
}

/// Query over sales for the monthly sales listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFilter {
    pub period: Period,
    pub payment_status: Option<PaymentStatus>,
}
