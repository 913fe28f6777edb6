use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Payment state of a sale. A commission is released only when the sale it
/// was generated from was `Paid` at generation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "payment_status", rename_all = "PascalCase"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ApiError;

    /// Accepts the English names and the labels the agency forms use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" | "Pendiente" => Ok(PaymentStatus::Pending),
            "Paid" | "Pagado" => Ok(PaymentStatus::Paid),
            other => Err(ApiError::validation(format!("unknown payment status '{other}'"))),
        }
    }
}
