use chrono::{SubsecRound, Utc};
use commission_core_api::{ApiError, ApiResult, ClientRequest, CommissionSettings};
use commission_core_db::engine::{build_commission_shares, referenced_partner_ids, validate_commission_shares};
use commission_core_db::models::client::{ClientModel, CommissionShareModel};
use commission_core_db::repository::{
    CreateBatch, DeleteBatch, ExistByIds, LoadBatch, Page, PageRequest, UpdateBatch,
};
use commission_core_db::utils::{bounded, bounded_opt};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::sale_service::persist_sale;
use super::{finish, open_audit_log, single, to_validation};
use crate::postgres_repositories::{CommissionRepositories, PostgresRepositories};

/// Maintains clients and their commission profile.
///
/// Editing a profile never touches sales already stored. Their snapshot and
/// line items change only when a sale is saved again, see
/// [`ClientService::resave_sales`].
pub struct ClientService {
    repos: Arc<PostgresRepositories>,
    settings: CommissionSettings,
}

impl ClientService {
    pub fn new(repos: Arc<PostgresRepositories>, settings: CommissionSettings) -> Self {
        Self { repos, settings }
    }

    pub async fn create(&self, actor_id: Uuid, request: &ClientRequest) -> ApiResult<ClientModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::create_in(&uow, actor_id, self.settings, request).await;
        finish(uow, result).await
    }

    pub async fn create_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        settings: CommissionSettings,
        request: &ClientRequest,
    ) -> ApiResult<ClientModel> {
        request.validate()?;
        let shares = checked_shares(uow, settings, request).await?;

        let mut client = ClientModel {
            id: Uuid::new_v4(),
            name: normalized_name(request)?,
            service: bounded("service", request.service.trim()).map_err(to_validation)?,
            industry: None,
            contact: None,
            total_commission_percentage: Decimal::ZERO,
            commission_shares: shares,
            created_at: Utc::now().trunc_subsecs(6),
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };
        apply_optional_fields(&mut client, request)?;
        client.recompute_total_commission();

        let audit_log = open_audit_log(uow, actor_id).await?;
        let created = uow
            .client_repository
            .create_batch(vec![client], Some(audit_log.id))
            .await?;
        let client = single(created, "client")?;
        info!(
            client_id = %client.id,
            total_commission = %client.total_commission_percentage,
            "client created"
        );
        Ok(client)
    }

    pub async fn update(
        &self,
        actor_id: Uuid,
        client_id: Uuid,
        request: &ClientRequest,
    ) -> ApiResult<ClientModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::update_in(&uow, actor_id, self.settings, client_id, request).await;
        finish(uow, result).await
    }

    pub async fn update_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        settings: CommissionSettings,
        client_id: Uuid,
        request: &ClientRequest,
    ) -> ApiResult<ClientModel> {
        request.validate()?;
        let mut client = Self::get_in(uow, client_id).await?;
        client.commission_shares = checked_shares(uow, settings, request).await?;
        client.name = normalized_name(request)?;
        client.service = bounded("service", request.service.trim()).map_err(to_validation)?;
        apply_optional_fields(&mut client, request)?;

        let audit_log = open_audit_log(uow, actor_id).await?;
        let updated = uow
            .client_repository
            .update_batch(vec![client], audit_log.id)
            .await?;
        let client = single(updated, "client")?;
        info!(
            client_id = %client.id,
            total_commission = %client.total_commission_percentage,
            "client updated, stored sales keep their snapshot until saved again"
        );
        Ok(client)
    }

    /// Save every sale of the client again so snapshots and line items pick
    /// up the current profile. Returns the number of sales processed.
    pub async fn resave_sales(&self, actor_id: Uuid, client_id: Uuid) -> ApiResult<usize> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::resave_sales_in(&uow, actor_id, client_id).await;
        finish(uow, result).await
    }

    pub async fn resave_sales_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        client_id: Uuid,
    ) -> ApiResult<usize> {
        let client = Self::get_in(uow, client_id).await?;
        let sales = uow.sale_repository.find_by_client_id(client_id).await?;
        let audit_log = open_audit_log(uow, actor_id).await?;

        let count = sales.len();
        for sale in sales {
            persist_sale(uow, sale, &client, audit_log.id, false).await?;
        }
        info!(%client_id, sales = count, "client sales saved again");
        Ok(count)
    }

    /// Delete a client with all of its sales and their line items.
    pub async fn delete(&self, actor_id: Uuid, client_id: Uuid) -> ApiResult<()> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::delete_in(&uow, actor_id, client_id).await;
        finish(uow, result).await
    }

    pub async fn delete_in(uow: &CommissionRepositories, actor_id: Uuid, client_id: Uuid) -> ApiResult<()> {
        let audit_log = open_audit_log(uow, actor_id).await?;

        let sale_ids: Vec<Uuid> = uow
            .sale_repository
            .find_by_client_id(client_id)
            .await?
            .iter()
            .map(|sale| sale.id)
            .collect();
        let sales_deleted = uow
            .sale_repository
            .delete_batch(&sale_ids, Some(audit_log.id))
            .await?;

        let deleted = uow
            .client_repository
            .delete_batch(&[client_id], Some(audit_log.id))
            .await?;
        if deleted == 0 {
            return Err(ApiError::not_found("client", client_id));
        }
        info!(%client_id, sales_deleted, "client deleted");
        Ok(())
    }

    pub async fn get(&self, client_id: Uuid) -> ApiResult<ClientModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::get_in(&uow, client_id).await;
        finish(uow, result).await
    }

    pub async fn get_in(uow: &CommissionRepositories, client_id: Uuid) -> ApiResult<ClientModel> {
        uow.client_repository
            .load_batch(&[client_id])
            .await?
            .pop()
            .flatten()
            .ok_or_else(|| ApiError::not_found("client", client_id))
    }

    pub async fn list(&self, page: PageRequest) -> ApiResult<Page<ClientModel>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = uow.client_repository.find_all(page).await.map_err(ApiError::from);
        finish(uow, result).await
    }
}

/// Parse, validate and check the partners of the submitted shares.
async fn checked_shares(
    uow: &CommissionRepositories,
    settings: CommissionSettings,
    request: &ClientRequest,
) -> ApiResult<Vec<CommissionShareModel>> {
    let shares = build_commission_shares(&request.commission_shares, settings.percentage_scale)?;
    validate_commission_shares(&shares)?;

    let partner_ids = referenced_partner_ids(&shares);
    if partner_ids.is_empty() {
        return Ok(shares);
    }

    let missing: Vec<Uuid> = uow
        .partner_repository
        .exist_by_ids(&partner_ids)
        .await?
        .into_iter()
        .filter_map(|(id, exists)| (!exists).then_some(id))
        .collect();
    if let Some(partner_id) = missing.first() {
        warn!(%partner_id, "commission share names an unknown partner");
        return Err(ApiError::validation(format!("unknown partner {partner_id}")));
    }
    Ok(shares)
}

fn apply_optional_fields(client: &mut ClientModel, request: &ClientRequest) -> ApiResult<()> {
    let industry = request.industry.as_deref().map(capitalize);
    let contact = request.contact.as_deref().map(title_case);
    client.industry = bounded_opt("industry", industry.as_deref()).map_err(to_validation)?;
    client.contact = bounded_opt("contact", contact.as_deref()).map_err(to_validation)?;
    Ok(())
}

/// Client names are stored upper case.
fn normalized_name(request: &ClientRequest) -> ApiResult<HeaplessString<150>> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("client name is required"));
    }
    bounded("name", &name.to_uppercase()).map_err(to_validation)
}

/// First letter upper case, the rest lower case.
fn capitalize(value: &str) -> String {
    let mut chars = value.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper case every letter that follows a non-letter, lower case the rest.
fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.trim().chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_utils::create_test_partner;
    use crate::service::SaleService;
    use crate::test_helper::setup_test_context;
    use chrono::NaiveDate;
    use commission_core_api::{CommissionShareRequest, PaymentStatus, PercentageScale, SaleRequest};
    use rust_decimal_macros::dec;
    use serial_test::serial;

    fn request(shares: Vec<CommissionShareRequest>) -> ClientRequest {
        ClientRequest {
            name: " acme norte ".to_string(),
            service: "SEO".to_string(),
            industry: Some("RETAIL goods".to_string()),
            contact: Some("ana o'neil-ruiz".to_string()),
            commission_shares: shares,
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("RETAIL goods"), "Retail goods");
        assert_eq!(capitalize("  "), "");
        assert_eq!(capitalize("é"), "É");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ana o'neil-ruiz"), "Ana O'Neil-Ruiz");
        assert_eq!(title_case("JUAN  PÉREZ"), "Juan  Pérez");
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_client_normalizes_and_totals() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let actor = Uuid::new_v4();
        let audit_log = open_audit_log(ctx.repos(), actor).await?;
        let partners = ctx
            .repos()
            .partner_repository
            .create_batch(vec![create_test_partner("Partner A")], Some(audit_log.id))
            .await?;

        let client = ClientService::create_in(
            ctx.repos(),
            actor,
            CommissionSettings::default(),
            &request(vec![
                CommissionShareRequest::new(Some(partners[0].id), Some("0.10")),
                CommissionShareRequest::new(None, Some("0.05")),
                CommissionShareRequest::default(),
            ]),
        )
        .await?;

        assert_eq!(client.name.as_str(), "ACME NORTE");
        assert_eq!(client.industry.as_ref().map(|s| s.as_str()), Some("Retail goods"));
        assert_eq!(client.contact.as_ref().map(|s| s.as_str()), Some("Ana O'Neil-Ruiz"));
        assert_eq!(client.total_commission_percentage, dec!(0.15));
        assert_eq!(client.commission_shares.len(), 3);

        let stored = ClientService::get_in(ctx.repos(), client.id).await?;
        assert_eq!(stored.total_commission_percentage, dec!(0.15));
        assert_eq!(stored.commission_shares, client.commission_shares);
        assert_eq!(stored.hash, client.hash);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_legacy_scale_reads_whole_percent() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let settings = CommissionSettings {
            percentage_scale: PercentageScale::LegacyAuto,
        };
        let client = ClientService::create_in(
            ctx.repos(),
            Uuid::new_v4(),
            settings,
            &request(vec![CommissionShareRequest::new(None, Some("12.5"))]),
        )
        .await?;
        assert_eq!(client.total_commission_percentage, dec!(0.125));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_rejects_unknown_partner_and_total_over_one(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let actor = Uuid::new_v4();

        let unknown = request(vec![CommissionShareRequest::new(Some(Uuid::new_v4()), Some("0.1"))]);
        let result = ClientService::create_in(ctx.repos(), actor, CommissionSettings::default(), &unknown).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));

        let too_much = request(vec![
            CommissionShareRequest::new(None, Some("0.7")),
            CommissionShareRequest::new(None, Some("0.4")),
        ]);
        let result = ClientService::create_in(ctx.repos(), actor, CommissionSettings::default(), &too_much).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_profile_edit_applies_on_next_save() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let actor = Uuid::new_v4();
        let audit_log = open_audit_log(ctx.repos(), actor).await?;
        let partners = ctx
            .repos()
            .partner_repository
            .create_batch(vec![create_test_partner("Partner A")], Some(audit_log.id))
            .await?;
        let partner_id = partners[0].id;

        let client = ClientService::create_in(
            ctx.repos(),
            actor,
            CommissionSettings::default(),
            &request(vec![CommissionShareRequest::new(Some(partner_id), Some("0.10"))]),
        )
        .await?;
        let saved = SaleService::save_in(
            ctx.repos(),
            actor,
            None,
            &SaleRequest {
                client_id: client.id,
                sale_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                sale_amount: dec!(1000.00),
                payment_status: PaymentStatus::Paid,
                invoicing_company: None,
                invoice_number: None,
                comments: None,
                entered_period: None,
            },
        )
        .await?;

        ClientService::update_in(
            ctx.repos(),
            actor,
            CommissionSettings::default(),
            client.id,
            &request(vec![CommissionShareRequest::new(Some(partner_id), Some("0.20"))]),
        )
        .await?;

        // stored sale keeps the old snapshot
        let untouched = SaleService::get_in(ctx.repos(), saved.sale.id).await?;
        assert_eq!(untouched.sale.commission_amount, dec!(100.00));
        assert_eq!(untouched.line_items[0].amount, dec!(100.00));

        let count = ClientService::resave_sales_in(ctx.repos(), actor, client.id).await?;
        assert_eq!(count, 1);
        let refreshed = SaleService::get_in(ctx.repos(), saved.sale.id).await?;
        assert_eq!(refreshed.sale.commission_rate, dec!(0.2));
        assert_eq!(refreshed.sale.commission_amount, dec!(200.00));
        assert_eq!(refreshed.line_items[0].amount, dec!(200.00));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_delete_client_removes_sales() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let actor = Uuid::new_v4();
        let client =
            ClientService::create_in(ctx.repos(), actor, CommissionSettings::default(), &request(vec![])).await?;
        let saved = SaleService::save_in(
            ctx.repos(),
            actor,
            None,
            &SaleRequest {
                client_id: client.id,
                sale_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                sale_amount: dec!(10.00),
                payment_status: PaymentStatus::Pending,
                invoicing_company: None,
                invoice_number: None,
                comments: None,
                entered_period: None,
            },
        )
        .await?;

        ClientService::delete_in(ctx.repos(), actor, client.id).await?;

        assert!(matches!(
            SaleService::get_in(ctx.repos(), saved.sale.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            ClientService::get_in(ctx.repos(), client.id).await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }
}
