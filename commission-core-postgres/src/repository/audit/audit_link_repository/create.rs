use commission_core_db::models::audit::{AuditEntityType, AuditLinkModel};
use sqlx::PgConnection;
use uuid::Uuid;

use super::repo_impl::AuditLinkRepositoryImpl;

/// Link an entity to the audit log of the operation that wrote it. Entity
/// repositories call this inside their own statement batch.
pub(crate) async fn insert_audit_link(
    conn: &mut PgConnection,
    audit_log_id: Uuid,
    entity_id: Uuid,
    entity_type: AuditEntityType,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_link (audit_log_id, entity_id, entity_type)
        VALUES ($1, $2, $3)
        ON CONFLICT (audit_log_id, entity_id) DO NOTHING
        "#,
    )
    .bind(audit_log_id)
    .bind(entity_id)
    .bind(entity_type)
    .execute(conn)
    .await?;
    Ok(())
}

impl AuditLinkRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &AuditLinkRepositoryImpl,
        audit_link: &AuditLinkModel,
    ) -> Result<(), sqlx::Error> {
        let mut tx = repo.executor.tx.lock().await;
        if let Some(transaction) = tx.as_mut() {
            insert_audit_link(
                &mut **transaction,
                audit_link.audit_log_id,
                audit_link.entity_id,
                audit_link.entity_type,
            )
            .await
        } else {
            Err(sqlx::Error::Configuration("Transaction has been consumed".into()))
        }
    }
}
