use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Inserts several entities inside the caller's transaction.
///
/// Auditable entities require `audit_log_id`; derived rows such as commission
/// line items accept it as an optional back-reference. The returned items
/// carry every generated field (hashes, audit ids).
///
/// # Example
/// ```ignore
/// let saved = partner_repo.create_batch(vec![partner], Some(audit_log.id)).await?;
/// ```
#[async_trait]
pub trait CreateBatch<DB: Database, T: Identifiable>: Send + Sync {
    async fn create_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
