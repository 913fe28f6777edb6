use commission_core_api::{ApiError, ApiResult, DatabaseConfig};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::repository::{
    AuditLinkRepositoryImpl, AuditLogRepositoryImpl, ClientRepositoryImpl,
    CommissionPaymentRepositoryImpl, CommissionRepositoryImpl, PartnerRepositoryImpl,
    SaleRepositoryImpl,
};
use postgres_unit_of_work::{Executor, TransactionAware};

/// Owns the connection pool and hands out one [`CommissionRepositories`]
/// per unit of work.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> ApiResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;
        info!(max_connections = config.max_connections, "connected to postgres");
        Ok(Self::new(Arc::new(pool)))
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    /// Create all repositories sharing a single transaction
    pub async fn create_all_repositories(&self) -> ApiResult<CommissionRepositories> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ApiError::DatabaseError(format!("Failed to begin transaction: {e}")))?;
        Ok(CommissionRepositories::new(Executor::new(tx)))
    }
}

/// Every repository of the workspace bound to one transaction. Dropping it
/// without [`commit`](Self::commit) rolls the transaction back.
pub struct CommissionRepositories {
    pub executor: Executor,
    pub audit_log_repository: Arc<AuditLogRepositoryImpl>,
    pub audit_link_repository: Arc<AuditLinkRepositoryImpl>,
    pub partner_repository: Arc<PartnerRepositoryImpl>,
    pub client_repository: Arc<ClientRepositoryImpl>,
    pub sale_repository: Arc<SaleRepositoryImpl>,
    pub commission_repository: Arc<CommissionRepositoryImpl>,
    pub commission_payment_repository: Arc<CommissionPaymentRepositoryImpl>,
}

impl CommissionRepositories {
    pub fn new(executor: Executor) -> Self {
        Self {
            audit_log_repository: Arc::new(AuditLogRepositoryImpl::new(executor.clone())),
            audit_link_repository: Arc::new(AuditLinkRepositoryImpl::new(executor.clone())),
            partner_repository: Arc::new(PartnerRepositoryImpl::new(executor.clone())),
            client_repository: Arc::new(ClientRepositoryImpl::new(executor.clone())),
            sale_repository: Arc::new(SaleRepositoryImpl::new(executor.clone())),
            commission_repository: Arc::new(CommissionRepositoryImpl::new(executor.clone())),
            commission_payment_repository: Arc::new(CommissionPaymentRepositoryImpl::new(executor.clone())),
            executor,
        }
    }

    pub async fn commit(self) -> ApiResult<()> {
        let tx = self.executor.tx.lock().await.take();
        let transaction = tx.ok_or_else(consumed)?;
        transaction.commit().await?;
        for repo in self.transaction_aware() {
            repo.on_commit()
                .await
                .map_err(|e| ApiError::InternalError(format!("commit hook failed: {e}")))?;
        }
        Ok(())
    }

    pub async fn rollback(self) -> ApiResult<()> {
        let tx = self.executor.tx.lock().await.take();
        let transaction = tx.ok_or_else(consumed)?;
        transaction.rollback().await?;
        for repo in self.transaction_aware() {
            repo.on_rollback()
                .await
                .map_err(|e| ApiError::InternalError(format!("rollback hook failed: {e}")))?;
        }
        Ok(())
    }

    fn transaction_aware(&self) -> [&dyn TransactionAware; 7] {
        [
            self.audit_log_repository.as_ref(),
            self.audit_link_repository.as_ref(),
            self.partner_repository.as_ref(),
            self.client_repository.as_ref(),
            self.sale_repository.as_ref(),
            self.commission_repository.as_ref(),
            self.commission_payment_repository.as_ref(),
        ]
    }
}

fn consumed() -> ApiError {
    ApiError::DatabaseError("Transaction has been consumed".to_string())
}
