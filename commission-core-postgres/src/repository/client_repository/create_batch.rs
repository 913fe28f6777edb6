use async_trait::async_trait;
use commission_core_db::models::{audit::AuditEntityType, client::ClientModel};
use commission_core_db::repository::create_batch::CreateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl ClientRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &ClientRepositoryImpl,
        items: Vec<ClientModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<ClientModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for ClientModel")?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            item.recompute_total_commission();
            item.audit_log_id = Some(audit_log_id);
            item.hash = 0;
            item.hash = hash_as_i64(&item)?;

            Self::insert_audit_row(&mut **transaction, &item).await?;

            sqlx::query(
                r#"
                INSERT INTO client
                (id, name, service, industry, contact, total_commission_percentage, created_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.service.as_str())
            .bind(item.industry.as_deref())
            .bind(item.contact.as_deref())
            .bind(item.total_commission_percentage)
            .bind(item.created_at)
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            Self::replace_shares(&mut **transaction, &item).await?;

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::Client).await?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, ClientModel> for ClientRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ClientModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<ClientModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_utils::{create_test_audit_log, create_test_client, create_test_partner};
    use crate::test_helper::setup_test_context;
    use commission_core_db::models::client::CommissionShareModel;
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::load::Load;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_batch_persists_shares() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let partner = create_test_partner("Share Holder");
        repos.partner_repository.create_batch(vec![partner.clone()], Some(audit_log.id)).await?;

        let client = create_test_client(vec![
            CommissionShareModel::new(2, None, Some(dec!(0.050000))),
            CommissionShareModel::new(1, Some(partner.id), Some(dec!(0.100000))),
        ]);
        let saved = repos
            .client_repository
            .create_batch(vec![client.clone()], Some(audit_log.id))
            .await?;
        assert_eq!(saved[0].total_commission_percentage, dec!(0.15));

        let loaded = repos.client_repository.load(client.id).await?;
        assert_eq!(loaded.commission_shares.len(), 2);
        assert_eq!(loaded.commission_shares[0].slot_index, 1);
        assert_eq!(loaded.commission_shares[0].partner_id, Some(partner.id));
        assert_eq!(loaded.commission_shares[1].partner_id, None);
        assert_eq!(loaded.hash, saved[0].hash);

        Ok(())
    }
}
