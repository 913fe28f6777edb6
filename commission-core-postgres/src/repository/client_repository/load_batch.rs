use async_trait::async_trait;
use commission_core_db::models::client::ClientModel;
use commission_core_db::repository::load_batch::LoadBatch;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ClientRepositoryImpl;
use crate::utils::TryFromRow;

impl ClientRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &ClientRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<ClientModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let rows = sqlx::query(r#"SELECT * FROM client WHERE id = ANY($1)"#)
            .bind(ids)
            .fetch_all(&mut **transaction)
            .await?;

        let mut clients = Vec::with_capacity(rows.len());
        for row in rows {
            clients.push(ClientModel::try_from_row(&row)?);
        }
        Self::attach_shares(&mut **transaction, &mut clients).await?;

        let mut item_map: std::collections::HashMap<Uuid, ClientModel> =
            clients.into_iter().map(|client| (client.id, client)).collect();

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            result.push(item_map.remove(id));
        }
        Ok(result)
    }
}

#[async_trait]
impl LoadBatch<Postgres, ClientModel> for ClientRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<ClientModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}
