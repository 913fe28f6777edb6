use async_trait::async_trait;
use commission_core_api::ConcurrentUpdate;
use commission_core_db::models::{audit::AuditEntityType, sale::SaleModel};
use commission_core_db::repository::update_batch::UpdateBatch;
use commission_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SaleRepositoryImpl;
use crate::repository::audit::audit_link_repository::insert_audit_link;

impl SaleRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<SaleModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<SaleModel>, Box<dyn Error + Send + Sync>> {
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

            // client_id is fixed at creation and never rewritten
            let rows_affected = sqlx::query(
                r#"
                UPDATE sale SET
                sale_date = $2, sale_amount = $3, payment_status = $4, service_label = $5,
                invoicing_company = $6, invoice_number = $7, comments = $8,
                commission_rate = $9, commission_amount = $10,
                antecedent_hash = $11, antecedent_audit_log_id = $12,
                hash = $13, audit_log_id = $14
                WHERE id = $1 AND hash = $15 AND audit_log_id = $16
                "#,
            )
            .bind(item.id)
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
            .bind(previous_hash)
            .bind(previous_audit_log_id)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                return Err(ConcurrentUpdate::new("sale", item.id).into());
            }

            insert_audit_link(&mut **transaction, audit_log_id, item.id, AuditEntityType::Sale).await?;

            updated_items.push(item);
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, SaleModel> for SaleRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<SaleModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<SaleModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::ConcurrentUpdate;
    use crate::repository::test_utils::{create_test_audit_log, create_test_client, create_test_sale};
    use crate::test_helper::setup_test_context;
    use commission_core_api::PaymentStatus;
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::update_batch::UpdateBatch;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_stale_update_is_rejected() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let client = create_test_client(vec![]);
        repos.client_repository.create_batch(vec![client.clone()], Some(audit_log.id)).await?;
        let saved = repos
            .sale_repository
            .create_batch(vec![create_test_sale(&client, dec!(10.00), PaymentStatus::Pending)], Some(audit_log.id))
            .await?;

        let first_log = create_test_audit_log();
        repos.audit_log_repository.create(&first_log).await?;
        let mut first = saved[0].clone();
        first.payment_status = PaymentStatus::Paid;
        repos.sale_repository.update_batch(vec![first], first_log.id).await?;

        // Second writer still holds the original hash
        let second_log = create_test_audit_log();
        repos.audit_log_repository.create(&second_log).await?;
        let mut second = saved[0].clone();
        second.sale_amount = dec!(20.00);
        let result = repos.sale_repository.update_batch(vec![second], second_log.id).await;
        let error = result.err().ok_or("stale update was accepted")?;
        assert!(error.downcast_ref::<ConcurrentUpdate>().is_some());

        Ok(())
    }
}
