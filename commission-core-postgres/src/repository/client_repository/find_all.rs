use commission_core_db::models::client::ClientModel;
use commission_core_db::repository::pagination::{Page, PageRequest};
use std::error::Error;

use super::repo_impl::ClientRepositoryImpl;
use crate::utils::TryFromRow;

impl ClientRepositoryImpl {
    /// Clients ordered by name, shares included.
    pub async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<ClientModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM client"#)
            .fetch_one(&mut **transaction)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM client
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
            items.push(ClientModel::try_from_row(&row)?);
        }
        Self::attach_shares(&mut **transaction, &mut items).await?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}
