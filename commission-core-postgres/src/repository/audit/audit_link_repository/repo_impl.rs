use async_trait::async_trait;
use commission_core_db::models::audit::AuditLinkModel;
use uuid::Uuid;

use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};

pub struct AuditLinkRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditLinkRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn create(
        &self,
        audit_link: &AuditLinkModel,
    ) -> Result<(), sqlx::Error> {
        Self::create_impl(self, audit_link).await
    }

    pub async fn find_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, sqlx::Error> {
        Self::find_by_audit_log_id_impl(self, audit_log_id).await
    }
}

#[async_trait]
impl TransactionAware for AuditLinkRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        Ok(())
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        Ok(())
    }
}
