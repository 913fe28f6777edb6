use commission_core_db::models::partner::PartnerModel;
use commission_core_db::repository::pagination::{Page, PageRequest};
use std::error::Error;

use super::repo_impl::PartnerRepositoryImpl;
use crate::utils::TryFromRow;

impl PartnerRepositoryImpl {
    /// Partners ordered by name.
    pub async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<PartnerModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM partner"#)
            .fetch_one(&mut **transaction)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM partner
            ORDER BY name, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&mut **transaction)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(PartnerModel::try_from_row(&row)?);
        }

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_utils::{create_test_audit_log, create_test_partner};
    use crate::test_helper::setup_test_context;
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::pagination::PageRequest;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_find_all_orders_by_name() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        repos
            .partner_repository
            .create_batch(
                vec![create_test_partner("Zz Last"), create_test_partner("Aa First")],
                Some(audit_log.id),
            )
            .await?;

        let page = repos.partner_repository.find_all(PageRequest::new(1000, 0)).await?;
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        let first = names.iter().position(|n| *n == "Aa First");
        let last = names.iter().position(|n| *n == "Zz Last");
        assert!(first < last);

        Ok(())
    }
}
