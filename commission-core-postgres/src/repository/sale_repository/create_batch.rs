use async_trait::async_trait;
use commission_core_db::models::{audit::AuditEntityType, sale::SaleModel};
use commission_core_db::repository::create_batch::CreateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SaleRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl SaleRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &SaleRepositoryImpl,
        items: Vec<SaleModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SaleModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for SaleModel")?;
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
                INSERT INTO sale
                (id, client_id, sale_date, sale_amount, payment_status, service_label, invoicing_company, invoice_number, comments, commission_rate, commission_amount, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(item.id)
            .bind(item.client_id)
            .bind(item.sale_date)
            .bind(item.sale_amount)
            .bind(item.payment_status)
            .bind(item.service_label.as_str())
            .bind(item.invoicing_company.as_deref())
            .bind(item.invoice_number.as_deref())
            .bind(item.comments.as_deref())
            .bind(item.commission_rate)
            .bind(item.commission_amount)
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::Sale).await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, SaleModel> for SaleRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<SaleModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SaleModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
