use chrono::{SubsecRound, Utc};
use commission_core_api::{ApiError, ApiResult, PaymentStatus, Period, SaleFilter, SaleRequest};
use commission_core_db::engine::{apply_commission_snapshot, generate_line_items, round_money};
use commission_core_db::models::client::ClientModel;
use commission_core_db::models::commission::CommissionModel;
use commission_core_db::models::sale::SaleModel;
use commission_core_db::repository::{
    CreateBatch, DeleteBatch, DeleteBySaleId, FindBySaleId, FindPageByFilter, LoadBatch,
    LockForUpdate, Page, PageRequest, UpdateBatch,
};
use commission_core_db::utils::bounded_opt;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::client_service::ClientService;
use super::{finish, open_audit_log, single, to_validation};
use crate::postgres_repositories::{CommissionRepositories, PostgresRepositories};

/// A sale as stored together with the line items generated for it.
#[derive(Debug, Clone, Serialize)]
pub struct SavedSale {
    pub sale: SaleModel,
    pub line_items: Vec<CommissionModel>,
}

/// Records sales and keeps their commission line items in step with them.
pub struct SaleService {
    repos: Arc<PostgresRepositories>,
}

impl SaleService {
    pub fn new(repos: Arc<PostgresRepositories>) -> Self {
        Self { repos }
    }

    /// Create a sale (`sale_id` is `None`) or edit an existing one, then
    /// regenerate its line items.
    pub async fn save(
        &self,
        actor_id: Uuid,
        sale_id: Option<Uuid>,
        request: &SaleRequest,
    ) -> ApiResult<SavedSale> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::save_in(&uow, actor_id, sale_id, request).await;
        finish(uow, result).await
    }

    pub async fn save_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        sale_id: Option<Uuid>,
        request: &SaleRequest,
    ) -> ApiResult<SavedSale> {
        request.validate()?;
        let client = ClientService::get_in(uow, request.client_id).await?;

        let (mut sale, is_new) = match sale_id {
            None => (new_sale(&client), true),
            Some(sale_id) => {
                let sale = Self::lock_and_load(uow, sale_id).await?;
                if sale.client_id != request.client_id {
                    return Err(ApiError::validation(
                        "the client of an existing sale cannot be changed",
                    ));
                }
                (sale, false)
            }
        };
        apply_request(&mut sale, request)?;

        let audit_log = open_audit_log(uow, actor_id).await?;
        persist_sale(uow, sale, &client, audit_log.id, is_new).await
    }

    /// Flip a sale between pending and paid. Goes through the full save so
    /// the release flag of every line item follows.
    pub async fn set_payment_status(
        &self,
        actor_id: Uuid,
        sale_id: Uuid,
        status: PaymentStatus,
    ) -> ApiResult<SavedSale> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::set_payment_status_in(&uow, actor_id, sale_id, status).await;
        finish(uow, result).await
    }

    pub async fn set_payment_status_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        sale_id: Uuid,
        status: PaymentStatus,
    ) -> ApiResult<SavedSale> {
        let mut sale = Self::lock_and_load(uow, sale_id).await?;
        let client = ClientService::get_in(uow, sale.client_id).await?;
        sale.payment_status = status;

        let audit_log = open_audit_log(uow, actor_id).await?;
        persist_sale(uow, sale, &client, audit_log.id, false).await
    }

    pub async fn delete(&self, actor_id: Uuid, sale_id: Uuid) -> ApiResult<()> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::delete_in(&uow, actor_id, sale_id).await;
        finish(uow, result).await
    }

    pub async fn delete_in(uow: &CommissionRepositories, actor_id: Uuid, sale_id: Uuid) -> ApiResult<()> {
        if !uow.sale_repository.lock_for_update(sale_id).await? {
            return Err(ApiError::not_found("sale", sale_id));
        }
        let audit_log = open_audit_log(uow, actor_id).await?;
        let line_items = uow.commission_repository.delete_by_sale_id(sale_id).await?;
        uow.sale_repository
            .delete_batch(&[sale_id], Some(audit_log.id))
            .await?;
        info!(%sale_id, line_items, "sale deleted");
        Ok(())
    }

    pub async fn get(&self, sale_id: Uuid) -> ApiResult<SavedSale> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::get_in(&uow, sale_id).await;
        finish(uow, result).await
    }

    pub async fn get_in(uow: &CommissionRepositories, sale_id: Uuid) -> ApiResult<SavedSale> {
        let sale = load_sale(uow, sale_id).await?;
        let line_items = uow.commission_repository.find_by_sale_id(sale_id).await?;
        Ok(SavedSale { sale, line_items })
    }

    pub async fn list(&self, filter: SaleFilter, page: PageRequest) -> ApiResult<Page<SaleModel>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = uow
            .sale_repository
            .find_page_by_filter(&filter, page)
            .await
            .map_err(ApiError::from);
        finish(uow, result).await
    }

    /// Monthly listing from raw query parameters. Missing or unparsable
    /// values fall back to the current month and year.
    pub async fn list_for_month(
        &self,
        month: Option<&str>,
        year: Option<&str>,
        payment_status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> ApiResult<Page<SaleModel>> {
        let period = Period::coerce(month, year, Utc::now().date_naive());
        self.list(SaleFilter { period, payment_status }, page).await
    }

    async fn lock_and_load(uow: &CommissionRepositories, sale_id: Uuid) -> ApiResult<SaleModel> {
        if !uow.sale_repository.lock_for_update(sale_id).await? {
            return Err(ApiError::not_found("sale", sale_id));
        }
        load_sale(uow, sale_id).await
    }
}

async fn load_sale(uow: &CommissionRepositories, sale_id: Uuid) -> ApiResult<SaleModel> {
    uow.sale_repository
        .load_batch(&[sale_id])
        .await?
        .pop()
        .flatten()
        .ok_or_else(|| ApiError::not_found("sale", sale_id))
}

fn new_sale(client: &ClientModel) -> SaleModel {
    SaleModel {
        id: Uuid::new_v4(),
        client_id: client.id,
        sale_date: Utc::now().date_naive(),
        sale_amount: Decimal::ZERO,
        payment_status: PaymentStatus::default(),
        service_label: client.service.clone(),
        invoicing_company: None,
        invoice_number: None,
        comments: None,
        commission_rate: Decimal::ZERO,
        commission_amount: Decimal::ZERO,
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

fn apply_request(sale: &mut SaleModel, request: &SaleRequest) -> ApiResult<()> {
    sale.sale_date = request.sale_date;
    sale.sale_amount = round_money(request.sale_amount);
    sale.payment_status = request.payment_status;
    sale.invoicing_company =
        bounded_opt("invoicing_company", request.invoicing_company.as_deref()).map_err(to_validation)?;
    sale.invoice_number =
        bounded_opt("invoice_number", request.invoice_number.as_deref()).map_err(to_validation)?;
    sale.comments = bounded_opt("comments", request.comments.as_deref()).map_err(to_validation)?;
    Ok(())
}

/// Store a sale with a fresh commission snapshot and replace its line items.
///
/// The sale row is locked before the old line items go, so two saves of the
/// same sale never interleave their delete and insert.
pub(crate) async fn persist_sale(
    uow: &CommissionRepositories,
    mut sale: SaleModel,
    client: &ClientModel,
    audit_log_id: Uuid,
    is_new: bool,
) -> ApiResult<SavedSale> {
    apply_commission_snapshot(&mut sale, client);

    let stored = if is_new {
        uow.sale_repository
            .create_batch(vec![sale], Some(audit_log_id))
            .await?
    } else {
        uow.sale_repository.update_batch(vec![sale], audit_log_id).await?
    };
    let sale = single(stored, "sale")?;

    if !uow.sale_repository.lock_for_update(sale.id).await? {
        return Err(ApiError::not_found("sale", sale.id));
    }
    let removed = uow.commission_repository.delete_by_sale_id(sale.id).await?;

    for share in client.commission_shares.iter().filter(|share| share.configured().is_none()) {
        debug!(sale_id = %sale.id, slot = share.slot_index, "commission slot not configured, skipped");
    }
    let line_items = generate_line_items(&sale, client, Utc::now().trunc_subsecs(6), Some(audit_log_id));
    let line_items = uow
        .commission_repository
        .create_batch(line_items, Some(audit_log_id))
        .await?;

    info!(
        sale_id = %sale.id,
        removed,
        generated = line_items.len(),
        commission_amount = %sale.commission_amount,
        "commission line items regenerated"
    );
    Ok(SavedSale { sale, line_items })
}
