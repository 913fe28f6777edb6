use chrono::{DateTime, Datelike, Utc};
use commission_core_api::first_day_of_next_month;
use uuid::Uuid;

use crate::engine::round_money;
use crate::models::{ClientModel, CommissionModel, SaleModel};

/// Compute the complete set of commission line items for a sale.
///
/// The result is a pure function of the sale and its client: one row per
/// share that names a partner and a positive percentage, in slot order.
/// Callers replace whatever rows the sale had before with this set.
pub fn generate_line_items(
    sale: &SaleModel,
    client: &ClientModel,
    generated_at: DateTime<Utc>,
    audit_log_id: Option<Uuid>,
) -> Vec<CommissionModel> {
    let period_month = sale.sale_date.month() as i32;
    let period_year = sale.sale_date.year();
    let release_eligible_from = first_day_of_next_month(sale.sale_date);
    let is_released = sale.payment_status.is_paid();

    client
        .configured_shares()
        .into_iter()
        .map(|(slot_index, partner_id, percentage)| CommissionModel {
            id: Uuid::new_v4(),
            sale_id: sale.id,
            client_id: client.id,
            partner_id: Some(partner_id),
            slot_index,
            service_label: sale.service_label.clone(),
            percentage,
            amount: round_money(percentage * sale.sale_amount),
            period_month,
            period_year,
            release_eligible_from,
            is_released,
            dispersion_status: sale.payment_status,
            dispersion_date: sale.sale_date,
            created_at: generated_at,
            audit_log_id,
        })
        .collect()
}
