use async_trait::async_trait;
use commission_core_db::models::commission::CommissionModel;
use commission_core_db::repository::create_batch::CreateBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::CommissionRepositoryImpl;

impl CommissionRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &CommissionRepositoryImpl,
        items: Vec<CommissionModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<CommissionModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            if audit_log_id.is_some() {
                item.audit_log_id = audit_log_id;
            }

            sqlx::query(
                r#"
                INSERT INTO commission
                (id, sale_id, client_id, partner_id, slot_index, service_label, percentage, amount, period_month, period_year, release_eligible_from, is_released, dispersion_status, dispersion_date, created_at, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(item.id)
            .bind(item.sale_id)
            .bind(item.client_id)
            .bind(item.partner_id)
            .bind(item.slot_index)
            .bind(item.service_label.as_str())
            .bind(item.percentage)
            .bind(item.amount)
            .bind(item.period_month)
            .bind(item.period_year)
            .bind(item.release_eligible_from)
            .bind(item.is_released)
            .bind(item.dispersion_status)
            .bind(item.dispersion_date)
            .bind(item.created_at)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, CommissionModel> for CommissionRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<CommissionModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<CommissionModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
