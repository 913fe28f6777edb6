use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

/// Row-level lock held until the surrounding transaction ends.
///
/// Serialises concurrent saves of the same entity so the delete-then-insert
/// of derived rows cannot interleave.
#[async_trait]
pub trait LockForUpdate<DB: Database>: Send + Sync {
    /// # Returns
    /// * `Ok(true)` - the row exists and is now locked
    /// * `Ok(false)` - no such row
    async fn lock_for_update(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
