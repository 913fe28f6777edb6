use async_trait::async_trait;
use commission_core_api::ConcurrentUpdate;
use commission_core_db::models::{audit::AuditEntityType, commission::CommissionPaymentModel};
use commission_core_db::repository::update_batch::UpdateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::CommissionPaymentRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl CommissionPaymentRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<CommissionPaymentModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<CommissionPaymentModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::with_capacity(items.len());

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let previous_hash = item.hash;
            let previous_audit_log_id = item
                .audit_log_id
                .ok_or("Entity must have audit_log_id for update")?;

            let mut entity_for_hashing = item.clone();
            entity_for_hashing.hash = 0;
            if hash_as_i64(&entity_for_hashing)? == previous_hash {
                updated_items.push(item);
                continue;
            }

            item.antecedent_hash = previous_hash;
            item.antecedent_audit_log_id = previous_audit_log_id;
            item.audit_log_id = Some(audit_log_id);
            item.hash = 0;
            item.hash = hash_as_i64(&item)?;

            Self::insert_audit_row(&mut **transaction, &item).await?;

            let rows_affected = sqlx::query(
                r#"
                UPDATE commission_payment SET
                partner_id = $2, period_month = $3, period_year = $4, amount = $5,
                payment_date = $6, comment = $7,
                antecedent_hash = $8, antecedent_audit_log_id = $9,
                hash = $10, audit_log_id = $11
                WHERE id = $1 AND hash = $12 AND audit_log_id = $13
                "#,
            )
            .bind(item.id)
            .bind(item.partner_id)
            .bind(item.period_month)
            .bind(item.period_year)
            .bind(item.amount)
            .bind(item.payment_date)
            .bind(item.comment.as_deref())
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .bind(previous_hash)
            .bind(previous_audit_log_id)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                return Err(ConcurrentUpdate::new("commission payment", item.id).into());
            }

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::CommissionPayment).await?;

            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, CommissionPaymentModel> for CommissionPaymentRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<CommissionPaymentModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<CommissionPaymentModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}
