use async_trait::async_trait;
use commission_core_db::models::commission::CommissionModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use crate::utils::{get_heapless_string, TryFromRow};

/// Commission line items. Rows are derived data owned by their sale, so
/// there is no update path and no `commission_audit` table.
pub struct CommissionRepositoryImpl {
    pub executor: Executor,
}

impl CommissionRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for CommissionModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(CommissionModel {
            id: row.try_get("id")?,
            sale_id: row.try_get("sale_id")?,
            client_id: row.try_get("client_id")?,
            partner_id: row.try_get("partner_id")?,
            slot_index: row.try_get("slot_index")?,
            service_label: get_heapless_string(row, "service_label")?,
            percentage: row.try_get("percentage")?,
            amount: row.try_get("amount")?,
            period_month: row.try_get("period_month")?,
            period_year: row.try_get("period_year")?,
            release_eligible_from: row.try_get("release_eligible_from")?,
            is_released: row.try_get("is_released")?,
            dispersion_status: row.try_get("dispersion_status")?,
            dispersion_date: row.try_get("dispersion_date")?,
            created_at: row.try_get("created_at")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

#[async_trait]
impl TransactionAware for CommissionRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        Ok(())
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        Ok(())
    }
}
