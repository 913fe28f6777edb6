use async_trait::async_trait;
use commission_core_db::models::{audit::AuditEntityType, commission::CommissionPaymentModel};
use commission_core_db::repository::create_batch::CreateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::CommissionPaymentRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl CommissionPaymentRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &CommissionPaymentRepositoryImpl,
        items: Vec<CommissionPaymentModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<CommissionPaymentModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for CommissionPaymentModel")?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            item.audit_log_id = Some(audit_log_id);
            item.hash = 0;
            item.hash = hash_as_i64(&item)?;

            Self::insert_audit_row(&mut **transaction, &item).await?;

            sqlx::query(
                r#"
                INSERT INTO commission_payment
                (id, partner_id, period_month, period_year, amount, payment_date, comment, created_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(item.id)
            .bind(item.partner_id)
            .bind(item.period_month)
            .bind(item.period_year)
            .bind(item.amount)
            .bind(item.payment_date)
            .bind(item.comment.as_deref())
            .bind(item.created_at)
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::CommissionPayment).await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, CommissionPaymentModel> for CommissionPaymentRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<CommissionPaymentModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<CommissionPaymentModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
