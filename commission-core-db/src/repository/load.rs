use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Loads one entity that is expected to exist.
#[async_trait]
pub trait Load<DB: Database, T: Identifiable>: Send + Sync {
    /// # Returns
    /// * `Ok(T)` - the loaded entity
    /// * `Err` - if the entity does not exist or the query failed
    async fn load(&self, id: Uuid) -> Result<T, Box<dyn std::error::Error + Send + Sync>>;
}
