use uuid::Uuid;

use super::identifiable::Identifiable;

/// Trait for entities whose every write is chained into the audit trail.
///
/// The hash covers the full entity state with `hash` itself set to 0; the
/// antecedent fields point at the previous snapshot.
pub trait Auditable: Identifiable {
    /// Returns the ID of the last audit log entry for this entity, if any
    fn get_last_audit_log_id(&self) -> Option<Uuid>;

    fn get_hash(&self) -> i64;
}
