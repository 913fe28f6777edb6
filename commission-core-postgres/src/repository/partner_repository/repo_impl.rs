use async_trait::async_trait;
use commission_core_db::models::partner::PartnerModel;
use commission_core_db::repository::load::Load;
use commission_core_db::repository::load_batch::LoadBatch;
use sqlx::{postgres::PgRow, Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct PartnerRepositoryImpl {
    pub executor: Executor,
}

impl PartnerRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for PartnerModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(PartnerModel {
            id: row.get("id"),
            name: get_heapless_string(row, "name")?,
            phone: get_optional_heapless_string(row, "phone")?,
            email: get_optional_heapless_string(row, "email")?,
            antecedent_hash: row.get("antecedent_hash"),
            antecedent_audit_log_id: row.get("antecedent_audit_log_id"),
            hash: row.get("hash"),
            audit_log_id: row.get("audit_log_id"),
        })
    }
}

#[async_trait]
impl Load<Postgres, PartnerModel> for PartnerRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<PartnerModel, Box<dyn Error + Send + Sync>> {
        let results = self.load_batch(&[id]).await?;
        results
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| format!("Partner {id} not found").into())
    }
}

#[async_trait]
impl TransactionAware for PartnerRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        Ok(())
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        Ok(())
    }
}
