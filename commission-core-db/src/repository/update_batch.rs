use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Updates several entities inside the caller's transaction.
///
/// Items whose content hash is unchanged are returned as-is without touching
/// the database or the audit trail.
///
/// # Example
/// ```ignore
/// let updated = sale_repo.update_batch(vec![sale], audit_log.id).await?;
/// ```
#[async_trait]
pub trait UpdateBatch<DB: Database, T: Identifiable>: Send + Sync {
    /// # Returns
    /// * `Ok(Vec<T>)` - the items as stored, with refreshed hash and audit fields
    /// * `Err` - if any statement failed; the transaction must then be dropped
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
