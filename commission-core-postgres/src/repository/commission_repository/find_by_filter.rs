use async_trait::async_trait;
use commission_core_api::CommissionFilter;
use commission_core_db::models::commission::CommissionModel;
use commission_core_db::repository::find_by_filter::FindByFilter;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::CommissionRepositoryImpl;
use crate::utils::TryFromRow;

impl CommissionRepositoryImpl {
    pub(super) async fn find_by_filter_impl(
        repo: &CommissionRepositoryImpl,
        filter: &CommissionFilter,
    ) -> Result<Vec<CommissionModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(
                r#"
                SELECT * FROM commission
                WHERE ($1::uuid IS NULL OR partner_id = $1)
                  AND ($2::uuid IS NULL OR client_id = $2)
                  AND ($3::int IS NULL OR period_month = $3)
                  AND ($4::int IS NULL OR period_year = $4)
                  AND (NOT $5 OR is_released)
                  AND ($6::date IS NULL OR (is_released AND release_eligible_from <= $6))
                ORDER BY period_year, period_month, dispersion_date, sale_id, slot_index
                "#,
            )
            .bind(filter.partner_id)
            .bind(filter.client_id)
            .bind(filter.period.map(|p| p.month_i32()))
            .bind(filter.period.map(|p| p.year))
            .bind(filter.released_only)
            .bind(filter.payable_as_of)
            .fetch_all(&mut **transaction)
            .await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(CommissionModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl FindByFilter<Postgres, CommissionModel, CommissionFilter> for CommissionRepositoryImpl {
    async fn find_by_filter(
        &self,
        filter: &CommissionFilter,
    ) -> Result<Vec<CommissionModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_filter_impl(self, filter).await
    }
}
