use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One `(partner, percentage)` slot of a client's commission profile.
///
/// `percentage` is a fraction in `[0, 1]`. Either side may be missing; such a
/// share is kept as entered but never produces a commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionShareModel {
    /// 1-based position, unique per client
    pub slot_index: i16,
    pub partner_id: Option<Uuid>,
    pub percentage: Option<Decimal>,
}

impl CommissionShareModel {
    pub fn new(slot_index: i16, partner_id: Option<Uuid>, percentage: Option<Decimal>) -> Self {
        Self {
            slot_index,
            partner_id,
            percentage,
        }
    }

    /// A share pays out only when it names a partner and a positive percentage.
    pub fn configured(&self) -> Option<(Uuid, Decimal)> {
        match (self.partner_id, self.percentage) {
            (Some(partner_id), Some(pct)) if pct > Decimal::ZERO => Some((partner_id, pct)),
            _ => None,
        }
    }
}
