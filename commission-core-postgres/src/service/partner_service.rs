use commission_core_api::{ApiError, ApiResult, PartnerRequest, PaymentFilter};
use commission_core_db::models::partner::PartnerModel;
use commission_core_db::repository::{
    CreateBatch, DeleteBatch, FindByFilter, LoadBatch, Page, PageRequest, UpdateBatch,
};
use commission_core_db::utils::{bounded, bounded_opt};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{finish, open_audit_log, single, to_validation};
use crate::postgres_repositories::{CommissionRepositories, PostgresRepositories};

/// Maintains the partners that commission shares point to.
pub struct PartnerService {
    repos: Arc<PostgresRepositories>,
}

impl PartnerService {
    pub fn new(repos: Arc<PostgresRepositories>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, actor_id: Uuid, request: &PartnerRequest) -> ApiResult<PartnerModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::create_in(&uow, actor_id, request).await;
        finish(uow, result).await
    }

    pub async fn create_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        request: &PartnerRequest,
    ) -> ApiResult<PartnerModel> {
        request.validate()?;
        let partner = PartnerModel {
            id: Uuid::new_v4(),
            name: bounded("name", request.name.trim()).map_err(to_validation)?,
            phone: bounded_opt("phone", request.phone.as_deref()).map_err(to_validation)?,
            email: bounded_opt("email", request.email.as_deref()).map_err(to_validation)?,
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };

        let audit_log = open_audit_log(uow, actor_id).await?;
        let created = uow
            .partner_repository
            .create_batch(vec![partner], Some(audit_log.id))
            .await?;
        let partner = single(created, "partner")?;
        info!(partner_id = %partner.id, "partner created");
        Ok(partner)
    }

    pub async fn update(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        request: &PartnerRequest,
    ) -> ApiResult<PartnerModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::update_in(&uow, actor_id, partner_id, request).await;
        finish(uow, result).await
    }

    pub async fn update_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        partner_id: Uuid,
        request: &PartnerRequest,
    ) -> ApiResult<PartnerModel> {
        request.validate()?;
        let mut partner = Self::get_in(uow, partner_id).await?;
        partner.name = bounded("name", request.name.trim()).map_err(to_validation)?;
        partner.phone = bounded_opt("phone", request.phone.as_deref()).map_err(to_validation)?;
        partner.email = bounded_opt("email", request.email.as_deref()).map_err(to_validation)?;

        let audit_log = open_audit_log(uow, actor_id).await?;
        let updated = uow
            .partner_repository
            .update_batch(vec![partner], audit_log.id)
            .await?;
        single(updated, "partner")
    }

    /// Delete a partner together with the payments made to it. Line items and
    /// client shares that named the partner keep their rows with no partner.
    pub async fn delete(&self, actor_id: Uuid, partner_id: Uuid) -> ApiResult<()> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::delete_in(&uow, actor_id, partner_id).await;
        finish(uow, result).await
    }

    pub async fn delete_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        partner_id: Uuid,
    ) -> ApiResult<()> {
        let audit_log = open_audit_log(uow, actor_id).await?;

        let filter = PaymentFilter {
            partner_id: Some(partner_id),
            period: None,
        };
        let payment_ids: Vec<Uuid> = uow
            .commission_payment_repository
            .find_by_filter(&filter)
            .await?
            .iter()
            .map(|payment| payment.id)
            .collect();
        let payments_deleted = uow
            .commission_payment_repository
            .delete_batch(&payment_ids, Some(audit_log.id))
            .await?;

        let deleted = uow
            .partner_repository
            .delete_batch(&[partner_id], Some(audit_log.id))
            .await?;
        if deleted == 0 {
            return Err(ApiError::not_found("partner", partner_id));
        }
        info!(%partner_id, payments_deleted, "partner deleted");
        Ok(())
    }

    pub async fn get(&self, partner_id: Uuid) -> ApiResult<PartnerModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::get_in(&uow, partner_id).await;
        finish(uow, result).await
    }

    pub async fn get_in(uow: &CommissionRepositories, partner_id: Uuid) -> ApiResult<PartnerModel> {
        uow.partner_repository
            .load_batch(&[partner_id])
            .await?
            .pop()
            .flatten()
            .ok_or_else(|| ApiError::not_found("partner", partner_id))
    }

    pub async fn list(&self, page: PageRequest) -> ApiResult<Page<PartnerModel>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = uow.partner_repository.find_all(page).await.map_err(ApiError::from);
        finish(uow, result).await
    }
}
