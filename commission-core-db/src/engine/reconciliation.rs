//! Aggregate reconciliation of commission line items against payouts.
//!
//! Payments are never tied to specific line items, so every figure here is a
//! sum per partner and period.

use std::collections::BTreeMap;

use commission_core_api::Period;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{CommissionModel, CommissionPaymentModel};

/// Which line items count as owed when computing the outstanding balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BalanceBasis {
    /// Every generated line item
    #[default]
    Earned,
    /// Only line items generated from a paid sale
    Released,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    pub earned: Decimal,
    pub released: Decimal,
    pub paid: Decimal,
}

impl BalanceSummary {
    fn add_line_item(&mut self, item: &CommissionModel) {
        self.earned += item.amount;
        if item.is_released {
            self.released += item.amount;
        }
    }

    fn add_payment(&mut self, payment: &CommissionPaymentModel) {
        self.paid += payment.amount;
    }

    /// Owed minus paid; negative when a partner was overpaid.
    pub fn outstanding(&self, basis: BalanceBasis) -> Decimal {
        match basis {
            BalanceBasis::Earned => self.earned - self.paid,
            BalanceBasis::Released => self.released - self.paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStatement {
    pub period: Period,
    pub summary: BalanceSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerBalance {
    pub partner_id: Uuid,
    pub summary: BalanceSummary,
}

/// Outstanding balance of one partner for one period.
pub fn outstanding_balance(
    partner_id: Uuid,
    period: Period,
    line_items: &[CommissionModel],
    payments: &[CommissionPaymentModel],
    basis: BalanceBasis,
) -> Decimal {
    let mut summary = BalanceSummary::default();
    line_items
        .iter()
        .filter(|item| item.partner_id == Some(partner_id) && item.period() == period)
        .for_each(|item| summary.add_line_item(item));
    payments
        .iter()
        .filter(|payment| payment.partner_id == partner_id && payment.period() == period)
        .for_each(|payment| summary.add_payment(payment));
    summary.outstanding(basis)
}

/// Per-period figures for one partner, oldest period first. A period shows up
/// if it has either line items or payments.
pub fn partner_statement(
    partner_id: Uuid,
    line_items: &[CommissionModel],
    payments: &[CommissionPaymentModel],
) -> Vec<PeriodStatement> {
    let mut periods: BTreeMap<Period, BalanceSummary> = BTreeMap::new();
    for item in line_items.iter().filter(|item| item.partner_id == Some(partner_id)) {
        periods.entry(item.period()).or_default().add_line_item(item);
    }
    for payment in payments.iter().filter(|payment| payment.partner_id == partner_id) {
        periods.entry(payment.period()).or_default().add_payment(payment);
    }
    periods
        .into_iter()
        .map(|(period, summary)| PeriodStatement { period, summary })
        .collect()
}

/// Per-partner figures for one period. Line items whose partner was deleted
/// are left out.
pub fn period_summary(
    period: Period,
    line_items: &[CommissionModel],
    payments: &[CommissionPaymentModel],
) -> Vec<PartnerBalance> {
    let mut partners: BTreeMap<Uuid, BalanceSummary> = BTreeMap::new();
    for item in line_items.iter().filter(|item| item.period() == period) {
        if let Some(partner_id) = item.partner_id {
            partners.entry(partner_id).or_default().add_line_item(item);
        }
    }
    for payment in payments.iter().filter(|payment| payment.period() == period) {
        partners.entry(payment.partner_id).or_default().add_payment(payment);
    }
    partners
        .into_iter()
        .map(|(partner_id, summary)| PartnerBalance { partner_id, summary })
        .collect()
}
