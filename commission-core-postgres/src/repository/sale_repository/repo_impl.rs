use async_trait::async_trait;
use commission_core_db::models::sale::SaleModel;
use commission_core_db::repository::load::Load;
use commission_core_db::repository::load_batch::LoadBatch;
use sqlx::{postgres::PgRow, PgConnection, Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct SaleRepositoryImpl {
    pub executor: Executor,
}

impl SaleRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub(super) async fn insert_audit_row(
        conn: &mut PgConnection,
        sale: &SaleModel,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sale_audit
            (id, client_id, sale_date, sale_amount, payment_status, service_label, invoicing_company, invoice_number, comments, commission_rate, commission_amount, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(sale.id)
        .bind(sale.client_id)
        .bind(sale.sale_date)
        .bind(sale.sale_amount)
        .bind(sale.payment_status)
        .bind(sale.service_label.as_str())
        .bind(sale.invoicing_company.as_deref())
        .bind(sale.invoice_number.as_deref())
        .bind(sale.comments.as_deref())
        .bind(sale.commission_rate)
        .bind(sale.commission_amount)
        .bind(sale.antecedent_hash)
        .bind(sale.antecedent_audit_log_id)
        .bind(sale.hash)
        .bind(sale.audit_log_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl TryFromRow<PgRow> for SaleModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(SaleModel {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            sale_date: row.try_get("sale_date")?,
            sale_amount: row.try_get("sale_amount")?,
            payment_status: row.try_get("payment_status")?,
            service_label: get_heapless_string(row, "service_label")?,
            invoicing_company: get_optional_heapless_string(row, "invoicing_company")?,
            invoice_number: get_optional_heapless_string(row, "invoice_number")?,
            comments: get_optional_heapless_string(row, "comments")?,
            commission_rate: row.try_get("commission_rate")?,
            commission_amount: row.try_get("commission_amount")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            antecedent_audit_log_id: row.try_get("antecedent_audit_log_id")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, SaleModel> for SaleRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<SaleModel, Box<dyn Error + Send + Sync>> {
        let results = self.load_batch(&[id]).await?;
        results
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| format!("Sale {id} not found").into())
    }
}

#[async_trait]
impl TransactionAware for SaleRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        Ok(())
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        Ok(())
    }
}
