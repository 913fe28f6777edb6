use async_trait::async_trait;
use commission_core_db::models::commission::CommissionPaymentModel;
use commission_core_db::repository::load::Load;
use commission_core_db::repository::load_batch::LoadBatch;
use sqlx::{postgres::PgRow, PgConnection, Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use crate::utils::{get_optional_heapless_string, TryFromRow};

pub struct CommissionPaymentRepositoryImpl {
    pub executor: Executor,
}

impl CommissionPaymentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub(super) async fn insert_audit_row(
        conn: &mut PgConnection,
        payment: &CommissionPaymentModel,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO commission_payment_audit
            (id, partner_id, period_month, period_year, amount, payment_date, comment, created_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(payment.id)
        .bind(payment.partner_id)
        .bind(payment.period_month)
        .bind(payment.period_year)
        .bind(payment.amount)
        .bind(payment.payment_date)
        .bind(payment.comment.as_deref())
        .bind(payment.created_at)
        .bind(payment.antecedent_hash)
        .bind(payment.antecedent_audit_log_id)
        .bind(payment.hash)
        .bind(payment.audit_log_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl TryFromRow<PgRow> for CommissionPaymentModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(CommissionPaymentModel {
            id: row.try_get("id")?,
            partner_id: row.try_get("partner_id")?,
            period_month: row.try_get("period_month")?,
            period_year: row.try_get("period_year")?,
            amount: row.try_get("amount")?,
            payment_date: row.try_get("payment_date")?,
            comment: get_optional_heapless_string(row, "comment")?,
            created_at: row.try_get("created_at")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            antecedent_audit_log_id: row.try_get("antecedent_audit_log_id")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, CommissionPaymentModel> for CommissionPaymentRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<CommissionPaymentModel, Box<dyn Error + Send + Sync>> {
        let results = self.load_batch(&[id]).await?;
        results
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| format!("Commission payment {id} not found").into())
    }
}

#[async_trait]
impl TransactionAware for CommissionPaymentRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        Ok(())
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        Ok(())
    }
}
