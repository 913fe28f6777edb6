use async_trait::async_trait;
use commission_core_db::models::audit::AuditEntityType;
use commission_core_db::repository::delete_batch::DeleteBatch;
use commission_core_db::repository::load_batch::LoadBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::PartnerRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl PartnerRepositoryImpl {
    pub(super) async fn delete_batch_impl(
        repo: &PartnerRepositoryImpl,
        ids: &[Uuid],
        audit_log_id: Option<Uuid>,
    ) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for PartnerModel")?;
        if ids.is_empty() {
            return Ok(0);
        }

        let entities_to_delete = repo.load_batch(ids).await?;
        let mut deleted_count = 0;

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for entity in entities_to_delete.into_iter().flatten() {
            // Final audit row closes the chain
            let mut final_audit_entity = entity.clone();
            final_audit_entity.antecedent_hash = entity.hash;
            final_audit_entity.antecedent_audit_log_id = entity
                .audit_log_id
                .ok_or("Entity must have audit_log_id for deletion")?;
            final_audit_entity.audit_log_id = Some(audit_log_id);
            final_audit_entity.hash = 0;
            final_audit_entity.hash = hash_as_i64(&final_audit_entity)?;

            sqlx::query(
                r#"
                INSERT INTO partner_audit
                (id, name, phone, email, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(final_audit_entity.id)
            .bind(final_audit_entity.name.as_str())
            .bind(final_audit_entity.phone.as_deref())
            .bind(final_audit_entity.email.as_deref())
            .bind(final_audit_entity.antecedent_hash)
            .bind(final_audit_entity.antecedent_audit_log_id)
            .bind(final_audit_entity.hash)
            .bind(final_audit_entity.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            let result = sqlx::query(r#"DELETE FROM partner WHERE id = $1"#)
                .bind(entity.id)
                .execute(&mut **transaction)
                .await?;

            insert_audit_link(&mut **transaction, audit_log_id, entity.id, AuditEntityType::Partner).await?;

            deleted_count += result.rows_affected() as usize;
        }

        Ok(deleted_count)
    }
}

#[async_trait]
impl DeleteBatch<Postgres> for PartnerRepositoryImpl {
    async fn delete_batch(
        &self,
        ids: &[Uuid],
        audit_log_id: Option<Uuid>,
    ) -> Result<usize, Box<dyn Error + Send + Sync>> {
        Self::delete_batch_impl(self, ids, audit_log_id).await
    }
}
