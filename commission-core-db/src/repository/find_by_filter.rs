use async_trait::async_trait;
use sqlx::Database;

use crate::models::identifiable::Identifiable;
use crate::repository::pagination::{Page, PageRequest};

/// Filtered listing. `F` is one of the query types from
/// `commission_core_api::domain::filters`.
#[async_trait]
pub trait FindByFilter<DB: Database, T: Identifiable, F: Send + Sync>: Send + Sync {
    async fn find_by_filter(&self, filter: &F) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Filtered listing with offset pagination.
#[async_trait]
pub trait FindPageByFilter<DB: Database, T: Identifiable, F: Send + Sync>: Send + Sync {
    async fn find_page_by_filter(
        &self,
        filter: &F,
        page: PageRequest,
    ) -> Result<Page<T>, Box<dyn std::error::Error + Send + Sync>>;
}
