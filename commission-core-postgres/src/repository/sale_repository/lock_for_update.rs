use async_trait::async_trait;
use commission_core_db::repository::lock_for_update::LockForUpdate;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SaleRepositoryImpl;

impl SaleRepositoryImpl {
    pub(super) async fn lock_for_update_impl(
        repo: &SaleRepositoryImpl,
        id: Uuid,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let locked: Option<Uuid> = sqlx::query_scalar(r#"SELECT id FROM sale WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut **transaction)
            .await?;

        Ok(locked.is_some())
    }
}

#[async_trait]
impl LockForUpdate<Postgres> for SaleRepositoryImpl {
    /// Row lock held until the unit of work ends; concurrent saves of the
    /// same sale serialize here.
    async fn lock_for_update(&self, id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Self::lock_for_update_impl(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_utils::{create_test_audit_log, create_test_client, create_test_sale};
    use crate::test_helper::setup_test_context;
    use commission_core_api::PaymentStatus;
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::lock_for_update::LockForUpdate;
    use rust_decimal_macros::dec;
    use serial_test::serial;
    use uuid::Uuid;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_lock_reports_missing_rows() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let client = create_test_client(vec![]);
        repos.client_repository.create_batch(vec![client.clone()], Some(audit_log.id)).await?;
        let sale = create_test_sale(&client, dec!(1.00), PaymentStatus::Pending);
        repos.sale_repository.create_batch(vec![sale.clone()], Some(audit_log.id)).await?;

        assert!(repos.sale_repository.lock_for_update(sale.id).await?);
        assert!(!repos.sale_repository.lock_for_update(Uuid::new_v4()).await?);

        Ok(())
    }
}
