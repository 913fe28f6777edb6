use async_trait::async_trait;
use commission_core_db::models::{audit::AuditEntityType, partner::PartnerModel};
use commission_core_db::repository::create_batch::CreateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::PartnerRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl PartnerRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &PartnerRepositoryImpl,
        items: Vec<PartnerModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PartnerModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for PartnerModel")?;
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

            sqlx::query(
                r#"
                INSERT INTO partner_audit
                (id, name, phone, email, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.phone.as_deref())
            .bind(item.email.as_deref())
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO partner
                (id, name, phone, email, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.phone.as_deref())
            .bind(item.email.as_deref())
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::Partner).await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, PartnerModel> for PartnerRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<PartnerModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<PartnerModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
