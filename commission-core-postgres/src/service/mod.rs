//! Transactional operations over the repositories.
//!
//! Every public method runs in its own unit of work: it opens one
//! transaction, writes a single audit log entry for the acting person and
//! commits only if every step succeeded. The `*_in` variants do the same work
//! inside a caller-supplied unit of work.

pub mod client_service;
pub mod commission_ledger_service;
pub mod commission_payment_service;
pub mod partner_service;
pub mod sale_service;

pub use client_service::ClientService;
pub use commission_ledger_service::CommissionLedgerService;
pub use commission_payment_service::CommissionPaymentService;
pub use partner_service::PartnerService;
pub use sale_service::{SaleService, SavedSale};

use commission_core_api::{ApiError, ApiResult};
use commission_core_db::models::audit::AuditLogModel;
use tracing::warn;
use uuid::Uuid;

use crate::postgres_repositories::CommissionRepositories;

/// Record who is about to change something.
pub(crate) async fn open_audit_log(
    uow: &CommissionRepositories,
    actor_id: Uuid,
) -> ApiResult<AuditLogModel> {
    let audit_log = AuditLogModel::new(actor_id);
    uow.audit_log_repository.create(&audit_log).await?;
    Ok(audit_log)
}

/// Commit the unit of work when `result` is a success, roll it back otherwise.
pub(crate) async fn finish<T>(uow: CommissionRepositories, result: ApiResult<T>) -> ApiResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = uow.rollback().await {
                warn!(%rollback_error, "rollback failed");
            }
            Err(error)
        }
    }
}

pub(crate) fn single<T>(mut items: Vec<T>, entity: &str) -> ApiResult<T> {
    items
        .pop()
        .ok_or_else(|| ApiError::InternalError(format!("{entity} write returned no row")))
}

pub(crate) fn to_validation(message: String) -> ApiError {
    ApiError::ValidationError(message)
}
