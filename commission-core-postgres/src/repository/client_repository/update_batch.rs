use async_trait::async_trait;
use commission_core_api::ConcurrentUpdate;
use commission_core_db::models::{audit::AuditEntityType, client::ClientModel};
use commission_core_db::repository::update_batch::UpdateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl ClientRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<ClientModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ClientModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::with_capacity(items.len());

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            item.recompute_total_commission();
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
                UPDATE client SET
                name = $2, service = $3, industry = $4, contact = $5,
                total_commission_percentage = $6,
                antecedent_hash = $7, antecedent_audit_log_id = $8,
                hash = $9, audit_log_id = $10
                WHERE id = $1 AND hash = $11 AND audit_log_id = $12
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.service.as_str())
            .bind(item.industry.as_deref())
            .bind(item.contact.as_deref())
            .bind(item.total_commission_percentage)
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
                return Err(ConcurrentUpdate::new("client", item.id).into());
            }

            Self::replace_shares(&mut **transaction, &item).await?;

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::Client).await?;

            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, ClientModel> for ClientRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<ClientModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<ClientModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_utils::{create_test_audit_log, create_test_client, create_test_partner};
    use crate::test_helper::setup_test_context;
    use commission_core_db::models::client::CommissionShareModel;
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::load::Load;
    use commission_core_db::repository::update_batch::UpdateBatch;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_update_replaces_shares_and_total() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let partner = create_test_partner("Updater");
        repos.partner_repository.create_batch(vec![partner.clone()], Some(audit_log.id)).await?;

        let client = create_test_client(vec![CommissionShareModel::new(1, Some(partner.id), Some(dec!(0.200000)))]);
        repos.client_repository.create_batch(vec![client.clone()], Some(audit_log.id)).await?;

        let update_log = create_test_audit_log();
        repos.audit_log_repository.create(&update_log).await?;
        let mut loaded = repos.client_repository.load(client.id).await?;
        loaded.commission_shares.clear();
        repos.client_repository.update_batch(vec![loaded], update_log.id).await?;

        let reloaded = repos.client_repository.load(client.id).await?;
        assert!(reloaded.commission_shares.is_empty());
        assert_eq!(reloaded.total_commission_percentage, Decimal::ZERO);
        assert_eq!(reloaded.audit_log_id, Some(update_log.id));

        Ok(())
    }
}
