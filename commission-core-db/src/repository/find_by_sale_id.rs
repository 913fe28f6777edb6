use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Rows owned by a sale, in generation (slot) order.
#[async_trait]
pub trait FindBySaleId<DB: Database, T: Identifiable>: Send + Sync {
    async fn find_by_sale_id(&self, sale_id: Uuid) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
