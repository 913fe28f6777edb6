use commission_core_db::models::sale::SaleModel;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SaleRepositoryImpl;
use crate::utils::TryFromRow;

impl SaleRepositoryImpl {
    /// Every sale of a client, oldest first.
    pub async fn find_by_client_id(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<SaleModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM sale WHERE client_id = $1 ORDER BY sale_date, id"#)
                .bind(client_id)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(SaleModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
