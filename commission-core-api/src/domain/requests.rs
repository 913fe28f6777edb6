//! Validated input for the commission services.
//!
//! Field limits mirror the column sizes of the persistence models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::payment_status::PaymentStatus;
use super::period::Period;

/// Maximum number of commission shares a client may carry.
pub const MAX_COMMISSION_SHARES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_partner_phone"))]
pub struct PartnerRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(equal = 10))]
    pub phone: Option<String>,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
}

fn validate_partner_phone(request: &PartnerRequest) -> Result<(), ValidationError> {
    match &request.phone {
        Some(phone) if !phone.chars().all(|c| c.is_ascii_digit()) => {
            let mut error = ValidationError::new("phone_digits");
            error.message = Some("phone must have exactly 10 digits".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

/// One commission share as typed by the user. The percentage is kept as raw
/// text so the configured percentage scale can interpret it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionShareRequest {
    pub partner_id: Option<Uuid>,
    pub percentage: Option<String>,
}

impl CommissionShareRequest {
    pub fn new(partner_id: Option<Uuid>, percentage: Option<&str>) -> Self {
        Self {
            partner_id,
            percentage: percentage.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub service: String,
    #[validate(length(max = 150))]
    pub industry: Option<String>,
    #[validate(length(max = 150))]
    pub contact: Option<String>,
    /// Ordered shares; position `i` becomes slot `i + 1`.
    #[validate(length(max = 10))]
    pub commission_shares: Vec<CommissionShareRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_sale_request"))]
pub struct SaleRequest {
    pub client_id: Uuid,
    pub sale_date: NaiveDate,
    pub sale_amount: Decimal,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[validate(length(max = 100))]
    pub invoicing_company: Option<String>,
    #[validate(length(max = 100))]
    pub invoice_number: Option<String>,
    #[validate(length(max = 255))]
    pub comments: Option<String>,
    /// Period the sale was entered under; when present the sale date must
    /// fall inside it.
    #[serde(default)]
    pub entered_period: Option<Period>,
}

fn validate_sale_request(request: &SaleRequest) -> Result<(), ValidationError> {
    if request.sale_amount.is_sign_negative() && !request.sale_amount.is_zero() {
        let mut error = ValidationError::new("sale_amount_negative");
        error.message = Some("sale amount must not be negative".into());
        return Err(error);
    }
    if let Some(period) = request.entered_period {
        if !period.contains(request.sale_date) {
            let mut error = ValidationError::new("sale_date_outside_period");
            error.message = Some(format!("sale date must belong to period {period}").into());
            return Err(error);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_payment_amount"))]
pub struct CommissionPaymentRequest {
    pub partner_id: Uuid,
    #[validate(range(min = 1, max = 12))]
    pub period_month: u32,
    pub period_year: i32,
    pub amount: Decimal,
    /// Defaults to today when absent.
    pub payment_date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub comment: Option<String>,
}

fn validate_payment_amount(request: &CommissionPaymentRequest) -> Result<(), ValidationError> {
    if request.amount.is_sign_negative() && !request.amount.is_zero() {
        let mut error = ValidationError::new("payment_amount_negative");
        error.message = Some("payment amount must not be negative".into());
        return Err(error);
    }
    Ok(())
}
