use async_trait::async_trait;
use commission_core_api::PaymentFilter;
use commission_core_db::models::commission::CommissionPaymentModel;
use commission_core_db::repository::find_by_filter::FindByFilter;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::CommissionPaymentRepositoryImpl;
use crate::utils::TryFromRow;

impl CommissionPaymentRepositoryImpl {
    pub(super) async fn find_by_filter_impl(
        repo: &CommissionPaymentRepositoryImpl,
        filter: &PaymentFilter,
    ) -> Result<Vec<CommissionPaymentModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(
                r#"
                SELECT * FROM commission_payment
                WHERE ($1::uuid IS NULL OR partner_id = $1)
                  AND ($2::int IS NULL OR period_month = $2)
                  AND ($3::int IS NULL OR period_year = $3)
                ORDER BY period_year, period_month, payment_date, created_at
                "#,
            )
            .bind(filter.partner_id)
            .bind(filter.period.map(|p| p.month_i32()))
            .bind(filter.period.map(|p| p.year))
            .fetch_all(&mut **transaction)
            .await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(CommissionPaymentModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl FindByFilter<Postgres, CommissionPaymentModel, PaymentFilter> for CommissionPaymentRepositoryImpl {
    async fn find_by_filter(
        &self,
        filter: &PaymentFilter,
    ) -> Result<Vec<CommissionPaymentModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_filter_impl(self, filter).await
    }
}
