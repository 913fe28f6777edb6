use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Loads several entities by id.
///
/// Results come back in the order of `ids`; missing entities are `None`.
///
/// # Example
/// ```ignore
/// let clients = client_repo.load_batch(&[client_id]).await?;
/// let client = clients.into_iter().next().flatten().ok_or("client not found")?;
/// ```
#[async_trait]
pub trait LoadBatch<DB: Database, T: Identifiable>: Send + Sync {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<T>>, Box<dyn std::error::Error + Send + Sync>>;
}
