use async_trait::async_trait;
use commission_core_db::models::commission::CommissionModel;
use commission_core_db::repository::find_by_sale_id::FindBySaleId;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::CommissionRepositoryImpl;
use crate::utils::TryFromRow;

impl CommissionRepositoryImpl {
    pub(super) async fn find_by_sale_id_impl(
        repo: &CommissionRepositoryImpl,
        sale_id: Uuid,
    ) -> Result<Vec<CommissionModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM commission WHERE sale_id = $1 ORDER BY slot_index"#)
                .bind(sale_id)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(CommissionModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl FindBySaleId<Postgres, CommissionModel> for CommissionRepositoryImpl {
    async fn find_by_sale_id(&self, sale_id: Uuid) -> Result<Vec<CommissionModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_sale_id_impl(self, sale_id).await
    }
}
