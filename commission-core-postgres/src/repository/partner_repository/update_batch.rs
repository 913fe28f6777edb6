use async_trait::async_trait;
use commission_core_api::ConcurrentUpdate;
use commission_core_db::models::{audit::AuditEntityType, partner::PartnerModel};
use commission_core_db::repository::update_batch::UpdateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::PartnerRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl PartnerRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<PartnerModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<PartnerModel>, Box<dyn Error + Send + Sync>> {
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

            let rows_affected = sqlx::query(
                r#"
                UPDATE partner SET
                name = $2, phone = $3, email = $4,
                antecedent_hash = $5, antecedent_audit_log_id = $6,
                hash = $7, audit_log_id = $8
                WHERE id = $1 AND hash = $9 AND audit_log_id = $10
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
            .bind(previous_hash)
            .bind(previous_audit_log_id)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                return Err(ConcurrentUpdate::new("partner", item.id).into());
            }

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::Partner).await?;

            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, PartnerModel> for PartnerRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<PartnerModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<PartnerModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_utils::{create_test_audit_log, create_test_partner};
    use crate::test_helper::setup_test_context;
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::update_batch::UpdateBatch;
    use heapless::String as HeaplessString;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_update_batch_chains_hashes() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let create_log = create_test_audit_log();
        repos.audit_log_repository.create(&create_log).await?;
        let saved = repos
            .partner_repository
            .create_batch(vec![create_test_partner("Before")], Some(create_log.id))
            .await?;

        let update_log = create_test_audit_log();
        repos.audit_log_repository.create(&update_log).await?;
        let mut changed = saved[0].clone();
        changed.name = HeaplessString::try_from("After").unwrap();
        let updated = repos
            .partner_repository
            .update_batch(vec![changed], update_log.id)
            .await?;

        assert_eq!(updated[0].antecedent_hash, saved[0].hash);
        assert_eq!(updated[0].antecedent_audit_log_id, create_log.id);
        assert_eq!(updated[0].audit_log_id, Some(update_log.id));
        assert_ne!(updated[0].hash, saved[0].hash);

        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_unchanged_update_is_skipped() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let create_log = create_test_audit_log();
        repos.audit_log_repository.create(&create_log).await?;
        let saved = repos
            .partner_repository
            .create_batch(vec![create_test_partner("Same")], Some(create_log.id))
            .await?;

        let update_log = create_test_audit_log();
        repos.audit_log_repository.create(&update_log).await?;
        let updated = repos
            .partner_repository
            .update_batch(saved.clone(), update_log.id)
            .await?;

        assert_eq!(updated, saved);
        Ok(())
    }
}
