//! Commission rules that do not touch the database.
//!
//! The postgres services load rows, call into these functions and persist the
//! result, so every business rule is testable without a connection.

pub mod generator;
pub mod profile;
pub mod reconciliation;
pub mod snapshot;

use rust_decimal::{Decimal, RoundingStrategy};

pub use generator::generate_line_items;
pub use profile::{
    build_commission_shares, referenced_partner_ids, total_commission_percentage, validate_commission_shares,
};
pub use reconciliation::{
    outstanding_balance, partner_statement, period_summary, BalanceBasis, BalanceSummary,
    PartnerBalance, PeriodStatement,
};
pub use snapshot::apply_commission_snapshot;

/// Money is kept at 2 decimal places, rounding half to even.
pub fn round_money(value: Decimal) -> Decimal {
    fixed_scale(value, 2)
}

/// Commission rates are kept at 4 decimal places of the fraction.
pub fn round_rate(value: Decimal) -> Decimal {
    fixed_scale(value, 4)
}

/// Share percentages are stored with 6 decimal places.
pub fn scale_percentage(value: Decimal) -> Decimal {
    fixed_scale(value, 6)
}

/// Round half to even and pad to exactly `dp` places, so values hash the same
/// before and after a round trip through a NUMERIC column.
fn fixed_scale(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(dp);
    rounded
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, Utc};
    use commission_core_api::PaymentStatus;
    use heapless::String as HeaplessString;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    use crate::models::{ClientModel, CommissionShareModel, SaleModel};

    pub fn client(shares: Vec<CommissionShareModel>) -> ClientModel {
        let mut client = ClientModel {
            id: Uuid::new_v4(),
            name: HeaplessString::from_str("ACME").unwrap(),
            service: HeaplessString::from_str("SEO").unwrap(),
            industry: None,
            contact: None,
            total_commission_percentage: Decimal::ZERO,
            commission_shares: shares,
            created_at: Utc::now(),
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };
        client.recompute_total_commission();
        client
    }

    pub fn sale(client: &ClientModel, amount: Decimal, date: NaiveDate, status: PaymentStatus) -> SaleModel {
        SaleModel {
            id: Uuid::new_v4(),
            client_id: client.id,
            sale_date: date,
            sale_amount: amount,
            payment_status: status,
            service_label: HeaplessString::new(),
            invoicing_company: None,
            invoice_number: None,
            comments: None,
            commission_rate: Decimal::ZERO,
            commission_amount: Decimal::ZERO,
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
