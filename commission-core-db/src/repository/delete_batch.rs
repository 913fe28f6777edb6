use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

/// Deletes entities by id inside the caller's transaction.
///
/// Auditable entities get a final snapshot written to their audit table
/// before the row goes away. Child rows follow the schema's cascade rules
/// (a sale takes its commission line items with it).
#[async_trait]
pub trait DeleteBatch<DB: Database>: Send + Sync {
    /// # Returns
    /// * `Ok(usize)` - number of rows actually deleted; unknown ids are ignored
    /// * `Err` - if any statement failed
    async fn delete_batch(
        &self,
        ids: &[Uuid],
        audit_log_id: Option<Uuid>,
    ) -> Result<usize, Box<dyn std::error::Error + Send + Sync>>;
}
