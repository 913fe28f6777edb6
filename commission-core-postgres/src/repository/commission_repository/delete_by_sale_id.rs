use async_trait::async_trait;
use commission_core_db::repository::delete_by_sale_id::DeleteBySaleId;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::CommissionRepositoryImpl;

impl CommissionRepositoryImpl {
    pub(super) async fn delete_by_sale_id_impl(
        repo: &CommissionRepositoryImpl,
        sale_id: Uuid,
    ) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let result = sqlx::query(r#"DELETE FROM commission WHERE sale_id = $1"#)
            .bind(sale_id)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected() as usize)
    }
}

#[async_trait]
impl DeleteBySaleId<Postgres> for CommissionRepositoryImpl {
    async fn delete_by_sale_id(&self, sale_id: Uuid) -> Result<usize, Box<dyn Error + Send + Sync>> {
        Self::delete_by_sale_id_impl(self, sale_id).await
    }
}
