use async_trait::async_trait;
use commission_core_db::models::partner::PartnerModel;
use commission_core_db::repository::load_batch::LoadBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::PartnerRepositoryImpl;
use crate::utils::TryFromRow;

impl PartnerRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &PartnerRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<PartnerModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"SELECT * FROM partner WHERE id = ANY($1)"#;
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query).bind(ids).fetch_all(&mut **transaction).await?
        };

        let mut item_map = std::collections::HashMap::new();
        for row in rows {
            let item = PartnerModel::try_from_row(&row)?;
            item_map.insert(item.id, item);
        }

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            result.push(item_map.remove(id));
        }
        Ok(result)
    }
}

#[async_trait]
impl LoadBatch<Postgres, PartnerModel> for PartnerRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<PartnerModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}
