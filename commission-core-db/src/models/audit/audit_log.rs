use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - One audit log per service operation; every entity written by that
///   operation references the same audit log.
/// - `updated_by_person_id` is the user who triggered the operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by_person_id: Uuid,
}

impl AuditLogModel {
    pub fn new(updated_by_person_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            updated_at: Utc::now(),
            updated_by_person_id,
        }
    }
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
