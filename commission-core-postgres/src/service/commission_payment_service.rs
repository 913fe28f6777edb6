use chrono::{SubsecRound, Utc};
use commission_core_api::{ApiError, ApiResult, CommissionPaymentRequest, PaymentFilter, Period};
use commission_core_db::engine::round_money;
use commission_core_db::models::commission::CommissionPaymentModel;
use commission_core_db::repository::{CreateBatch, DeleteBatch, ExistByIds, FindByFilter, LoadBatch, UpdateBatch};
use commission_core_db::utils::bounded_opt;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{finish, open_audit_log, single, to_validation};
use crate::postgres_repositories::{CommissionRepositories, PostgresRepositories};

/// Records payouts to partners. A payment covers a partner and a period as a
/// whole, never individual line items.
pub struct CommissionPaymentService {
    repos: Arc<PostgresRepositories>,
}

impl CommissionPaymentService {
    pub fn new(repos: Arc<PostgresRepositories>) -> Self {
        Self { repos }
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        request: &CommissionPaymentRequest,
    ) -> ApiResult<CommissionPaymentModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::create_in(&uow, actor_id, request).await;
        finish(uow, result).await
    }

    pub async fn create_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        request: &CommissionPaymentRequest,
    ) -> ApiResult<CommissionPaymentModel> {
        request.validate()?;
        let period = Period::new(request.period_month, request.period_year)?;
        ensure_partner_exists(uow, request.partner_id).await?;

        let payment = CommissionPaymentModel {
            id: Uuid::new_v4(),
            partner_id: request.partner_id,
            period_month: period.month_i32(),
            period_year: period.year,
            amount: round_money(request.amount),
            payment_date: request.payment_date.unwrap_or_else(|| Utc::now().date_naive()),
            comment: bounded_opt("comment", request.comment.as_deref()).map_err(to_validation)?,
            created_at: Utc::now().trunc_subsecs(6),
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };

        let audit_log = open_audit_log(uow, actor_id).await?;
        let created = uow
            .commission_payment_repository
            .create_batch(vec![payment], Some(audit_log.id))
            .await?;
        let payment = single(created, "commission payment")?;
        info!(
            payment_id = %payment.id,
            partner_id = %payment.partner_id,
            %period,
            amount = %payment.amount,
            "commission payment recorded"
        );
        Ok(payment)
    }

    pub async fn update(
        &self,
        actor_id: Uuid,
        payment_id: Uuid,
        request: &CommissionPaymentRequest,
    ) -> ApiResult<CommissionPaymentModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::update_in(&uow, actor_id, payment_id, request).await;
        finish(uow, result).await
    }

    pub async fn update_in(
        uow: &CommissionRepositories,
        actor_id: Uuid,
        payment_id: Uuid,
        request: &CommissionPaymentRequest,
    ) -> ApiResult<CommissionPaymentModel> {
        request.validate()?;
        let period = Period::new(request.period_month, request.period_year)?;
        let mut payment = Self::get_in(uow, payment_id).await?;
        if payment.partner_id != request.partner_id {
            ensure_partner_exists(uow, request.partner_id).await?;
        }

        payment.partner_id = request.partner_id;
        payment.period_month = period.month_i32();
        payment.period_year = period.year;
        payment.amount = round_money(request.amount);
        if let Some(payment_date) = request.payment_date {
            payment.payment_date = payment_date;
        }
        payment.comment = bounded_opt("comment", request.comment.as_deref()).map_err(to_validation)?;

        let audit_log = open_audit_log(uow, actor_id).await?;
        let updated = uow
            .commission_payment_repository
            .update_batch(vec![payment], audit_log.id)
            .await?;
        single(updated, "commission payment")
    }

    pub async fn delete(&self, actor_id: Uuid, payment_id: Uuid) -> ApiResult<()> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::delete_in(&uow, actor_id, payment_id).await;
        finish(uow, result).await
    }

    pub async fn delete_in(uow: &CommissionRepositories, actor_id: Uuid, payment_id: Uuid) -> ApiResult<()> {
        let audit_log = open_audit_log(uow, actor_id).await?;
        let deleted = uow
            .commission_payment_repository
            .delete_batch(&[payment_id], Some(audit_log.id))
            .await?;
        if deleted == 0 {
            return Err(ApiError::not_found("commission payment", payment_id));
        }
        Ok(())
    }

    pub async fn get(&self, payment_id: Uuid) -> ApiResult<CommissionPaymentModel> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::get_in(&uow, payment_id).await;
        finish(uow, result).await
    }

    pub async fn get_in(uow: &CommissionRepositories, payment_id: Uuid) -> ApiResult<CommissionPaymentModel> {
        uow.commission_payment_repository
            .load_batch(&[payment_id])
            .await?
            .pop()
            .flatten()
            .ok_or_else(|| ApiError::not_found("commission payment", payment_id))
    }

    pub async fn list(&self, filter: PaymentFilter) -> ApiResult<Vec<CommissionPaymentModel>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = uow
            .commission_payment_repository
            .find_by_filter(&filter)
            .await
            .map_err(ApiError::from);
        finish(uow, result).await
    }
}

async fn ensure_partner_exists(uow: &CommissionRepositories, partner_id: Uuid) -> ApiResult<()> {
    let exists = uow
        .partner_repository
        .exist_by_ids(&[partner_id])
        .await?
        .first()
        .is_some_and(|(_, exists)| *exists);
    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found("partner", partner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_utils::create_test_partner;
    use crate::service::PartnerService;
    use crate::test_helper::{setup_shared_repos, setup_test_context, TestContext};
    use chrono::NaiveDate;
    use commission_core_api::PartnerRequest;
    use std::time::Duration;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    async fn partner(ctx: &TestContext) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let audit_log = open_audit_log(ctx.repos(), Uuid::new_v4()).await?;
        let created = ctx
            .repos()
            .partner_repository
            .create_batch(vec![create_test_partner("Partner A")], Some(audit_log.id))
            .await?;
        Ok(created[0].id)
    }

    fn request(partner_id: Uuid, month: u32, amount: Decimal) -> CommissionPaymentRequest {
        CommissionPaymentRequest {
            partner_id,
            period_month: month,
            period_year: 2024,
            amount,
            payment_date: None,
            comment: Some("transferencia".to_string()),
        }
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_payment_defaults_date_to_today() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let partner_id = partner(&ctx).await?;

        let payment = CommissionPaymentService::create_in(
            ctx.repos(),
            Uuid::new_v4(),
            &request(partner_id, 3, dec!(100.005)),
        )
        .await?;
        assert_eq!(payment.payment_date, Utc::now().date_naive());
        assert_eq!(payment.amount, dec!(100.00));
        assert_eq!(payment.period(), Period::new(3, 2024)?);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_create_payment_validation() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let partner_id = partner(&ctx).await?;
        let actor = Uuid::new_v4();

        let bad_month = CommissionPaymentService::create_in(ctx.repos(), actor, &request(partner_id, 13, dec!(1))).await;
        assert!(matches!(bad_month, Err(ApiError::ValidationError(_))));

        let unknown = CommissionPaymentService::create_in(ctx.repos(), actor, &request(Uuid::new_v4(), 3, dec!(1))).await;
        assert!(matches!(unknown, Err(ApiError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_update_and_delete_payment() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let partner_id = partner(&ctx).await?;
        let actor = Uuid::new_v4();
        let payment = CommissionPaymentService::create_in(ctx.repos(), actor, &request(partner_id, 3, dec!(50))).await?;

        let mut changed = request(partner_id, 4, dec!(75.50));
        changed.payment_date = NaiveDate::from_ymd_opt(2024, 5, 2);
        let updated = CommissionPaymentService::update_in(ctx.repos(), actor, payment.id, &changed).await?;
        assert_eq!(updated.period_month, 4);
        assert_eq!(updated.amount, dec!(75.50));
        assert_eq!(updated.payment_date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(updated.antecedent_hash, payment.hash);

        CommissionPaymentService::delete_in(ctx.repos(), actor, payment.id).await?;
        assert!(matches!(
            CommissionPaymentService::get_in(ctx.repos(), payment.id).await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_edit_from_stale_hash_is_a_conflict() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let partners = PartnerService::new(repos.clone());
        let payments = CommissionPaymentService::new(repos.clone());
        let actor = Uuid::new_v4();
        let partner = partners
            .create(
                actor,
                &PartnerRequest {
                    name: "Partner A".to_string(),
                    phone: None,
                    email: None,
                },
            )
            .await?;
        let payment = payments.create(actor, &request(partner.id, 3, dec!(50))).await?;

        // First writer updates the row and keeps its transaction open
        let first = repos.create_all_repositories().await?;
        CommissionPaymentService::update_in(&first, actor, payment.id, &request(partner.id, 3, dec!(60))).await?;

        // Second writer loads the committed row, then waits on the row lock
        let second = {
            let payments = CommissionPaymentService::new(repos.clone());
            let payment_id = payment.id;
            let partner_id = partner.id;
            tokio::spawn(async move { payments.update(actor, payment_id, &request(partner_id, 3, dec!(70))).await })
        };
        tokio::time::sleep(Duration::from_millis(300)).await;
        first.commit().await?;

        let result = second.await?;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(payments.get(payment.id).await?.amount, dec!(60.00));

        partners.delete(actor, partner.id).await?;
        Ok(())
    }
}
