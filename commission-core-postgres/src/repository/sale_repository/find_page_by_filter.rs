use async_trait::async_trait;
use commission_core_api::SaleFilter;
use commission_core_db::models::sale::SaleModel;
use commission_core_db::repository::find_by_filter::FindPageByFilter;
use commission_core_db::repository::pagination::{Page, PageRequest};
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::SaleRepositoryImpl;
use crate::utils::TryFromRow;

impl SaleRepositoryImpl {
    pub(super) async fn find_page_by_filter_impl(
        repo: &SaleRepositoryImpl,
        filter: &SaleFilter,
        page: PageRequest,
    ) -> Result<Page<SaleModel>, Box<dyn Error + Send + Sync>> {
        let from = filter.period.first_day();
        let to = filter.period.last_day();

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM sale
            WHERE sale_date BETWEEN $1 AND $2
              AND ($3::payment_status IS NULL OR payment_status = $3)
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(filter.payment_status)
        .fetch_one(&mut **transaction)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM sale
            WHERE sale_date BETWEEN $1 AND $2
              AND ($3::payment_status IS NULL OR payment_status = $3)
            ORDER BY sale_date, id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(filter.payment_status)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(&mut **transaction)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(SaleModel::try_from_row(&row)?);
        }

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[async_trait]
impl FindPageByFilter<Postgres, SaleModel, SaleFilter> for SaleRepositoryImpl {
    async fn find_page_by_filter(
        &self,
        filter: &SaleFilter,
        page: PageRequest,
    ) -> Result<Page<SaleModel>, Box<dyn Error + Send + Sync>> {
        Self::find_page_by_filter_impl(self, filter, page).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_utils::{create_test_audit_log, create_test_client, create_test_sale};
    use crate::test_helper::setup_test_context;
    use chrono::NaiveDate;
    use commission_core_api::{PaymentStatus, Period, SaleFilter};
    use commission_core_db::repository::create_batch::CreateBatch;
    use commission_core_db::repository::find_by_filter::FindPageByFilter;
    use commission_core_db::repository::pagination::PageRequest;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_filter_by_period_and_status() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repos = ctx.repos();

        let audit_log = create_test_audit_log();
        repos.audit_log_repository.create(&audit_log).await?;
        let client = create_test_client(vec![]);
        repos.client_repository.create_batch(vec![client.clone()], Some(audit_log.id)).await?;

        // Far-off period so rows left by other tests cannot interfere
        let period = Period::new(7, 1999)?;
        let mut paid = create_test_sale(&client, dec!(10.00), PaymentStatus::Paid);
        paid.sale_date = NaiveDate::from_ymd_opt(1999, 7, 31).unwrap();
        let mut pending = create_test_sale(&client, dec!(20.00), PaymentStatus::Pending);
        pending.sale_date = NaiveDate::from_ymd_opt(1999, 7, 1).unwrap();
        let mut outside = create_test_sale(&client, dec!(30.00), PaymentStatus::Paid);
        outside.sale_date = NaiveDate::from_ymd_opt(1999, 8, 1).unwrap();
        repos
            .sale_repository
            .create_batch(vec![paid.clone(), pending.clone(), outside], Some(audit_log.id))
            .await?;

        let all = repos
            .sale_repository
            .find_page_by_filter(&SaleFilter { period, payment_status: None }, PageRequest::default())
            .await?;
        assert_eq!(all.total, 2);
        assert_eq!(all.items[0].id, pending.id);
        assert_eq!(all.items[1].id, paid.id);

        let only_paid = repos
            .sale_repository
            .find_page_by_filter(
                &SaleFilter { period, payment_status: Some(PaymentStatus::Paid) },
                PageRequest::default(),
            )
            .await?;
        assert_eq!(only_paid.items.len(), 1);
        assert_eq!(only_paid.items[0].id, paid.id);

        Ok(())
    }
}
