use commission_core_db::models::audit::AuditLogModel;
use uuid::Uuid;

use postgres_unit_of_work::Executor;

pub async fn load_batch_impl(
    executor: &Executor,
    ids: &[Uuid],
) -> Result<Vec<Option<AuditLogModel>>, Box<dyn std::error::Error + Send + Sync>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let query = sqlx::query_as::<_, AuditLogModel>(
        r#"
        SELECT id, updated_at, updated_by_person_id
        FROM audit_log
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids);

    let mut tx = executor.tx.lock().await;
    let rows = if let Some(transaction) = tx.as_mut() {
        query.fetch_all(&mut **transaction).await?
    } else {
        return Err("Transaction has been consumed".into());
    };

    let mut map: std::collections::HashMap<Uuid, AuditLogModel> = rows
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    // Same order as the input ids
    let result = ids
        .iter()
        .map(|id| map.remove(id))
        .collect();

    Ok(result)
}
