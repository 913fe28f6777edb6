use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

/// Removes every row owned by a sale. Used by commission regeneration, which
/// must run inside the same transaction as the re-insert.
#[async_trait]
pub trait DeleteBySaleId<DB: Database>: Send + Sync {
    /// # Returns
    /// * `Ok(usize)` - number of rows removed
    async fn delete_by_sale_id(&self, sale_id: Uuid) -> Result<usize, Box<dyn std::error::Error + Send + Sync>>;
}
