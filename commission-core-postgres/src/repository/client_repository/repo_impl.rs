use async_trait::async_trait;
use commission_core_db::models::client::{ClientModel, CommissionShareModel};
use commission_core_db::repository::load::Load;
use commission_core_db::repository::load_batch::LoadBatch;
use sqlx::{postgres::PgRow, PgConnection, Postgres, Row};
use std::collections::HashMap;
use std::error::Error;
use uuid::Uuid;

use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

/// Clients together with their commission shares. The shares live in
/// `client_commission_share` and are always written and read as a whole.
pub struct ClientRepositoryImpl {
    pub executor: Executor,
}

impl ClientRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub(super) async fn replace_shares(
        conn: &mut PgConnection,
        client: &ClientModel,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(r#"DELETE FROM client_commission_share WHERE client_id = $1"#)
            .bind(client.id)
            .execute(&mut *conn)
            .await?;

        for share in &client.commission_shares {
            sqlx::query(
                r#"
                INSERT INTO client_commission_share (client_id, slot_index, partner_id, percentage)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(client.id)
            .bind(share.slot_index)
            .bind(share.partner_id)
            .bind(share.percentage)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub(super) async fn insert_audit_row(
        conn: &mut PgConnection,
        client: &ClientModel,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO client_audit
            (id, name, service, industry, contact, total_commission_percentage, commission_shares, created_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(client.id)
        .bind(client.name.as_str())
        .bind(client.service.as_str())
        .bind(client.industry.as_deref())
        .bind(client.contact.as_deref())
        .bind(client.total_commission_percentage)
        .bind(serde_json::to_value(&client.commission_shares)?)
        .bind(client.created_at)
        .bind(client.antecedent_hash)
        .bind(client.antecedent_audit_log_id)
        .bind(client.hash)
        .bind(client.audit_log_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Fill `commission_shares` of already loaded clients, in slot order.
    pub(super) async fn attach_shares(
        conn: &mut PgConnection,
        clients: &mut [ClientModel],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if clients.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
        let rows = sqlx::query(
            r#"
            SELECT client_id, slot_index, partner_id, percentage
            FROM client_commission_share
            WHERE client_id = ANY($1)
            ORDER BY client_id, slot_index
            "#,
        )
        .bind(&ids)
        .fetch_all(conn)
        .await?;

        let mut shares: HashMap<Uuid, Vec<CommissionShareModel>> = HashMap::new();
        for row in rows {
            let client_id: Uuid = row.try_get("client_id")?;
            shares
                .entry(client_id)
                .or_default()
                .push(CommissionShareModel::try_from_row(&row)?);
        }
        for client in clients.iter_mut() {
            client.commission_shares = shares.remove(&client.id).unwrap_or_default();
        }
        Ok(())
    }
}

impl TryFromRow<PgRow> for ClientModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ClientModel {
            id: row.try_get("id")?,
            name: get_heapless_string(row, "name")?,
            service: get_heapless_string(row, "service")?,
            industry: get_optional_heapless_string(row, "industry")?,
            contact: get_optional_heapless_string(row, "contact")?,
            total_commission_percentage: row.try_get("total_commission_percentage")?,
            commission_shares: Vec::new(),
            created_at: row.try_get("created_at")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            antecedent_audit_log_id: row.try_get("antecedent_audit_log_id")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

impl TryFromRow<PgRow> for CommissionShareModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(CommissionShareModel {
            slot_index: row.try_get("slot_index")?,
            partner_id: row.try_get("partner_id")?,
            percentage: row.try_get("percentage")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, ClientModel> for ClientRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<ClientModel, Box<dyn Error + Send + Sync>> {
        let results = self.load_batch(&[id]).await?;
        results
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| format!("Client {id} not found").into())
    }
}

#[async_trait]
impl TransactionAware for ClientRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        Ok(())
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        Ok(())
    }
}
