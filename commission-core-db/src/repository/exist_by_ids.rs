use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

/// Existence check for several ids at once.
///
/// Used by the services to reject references to unknown partners before
/// anything is written.
#[async_trait]
pub trait ExistByIds<DB: Database>: Send + Sync {
    /// # Returns
    /// * `Ok(Vec<(Uuid, bool)>)` - one entry per requested id, in request order
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, Box<dyn std::error::Error + Send + Sync>>;
}
