use commission_core_api::{ApiResult, CommissionFilter, PaymentFilter, Period};
use commission_core_db::engine::{
    outstanding_balance, partner_statement, period_summary, BalanceBasis, PartnerBalance,
    PeriodStatement,
};
use commission_core_db::models::commission::{CommissionModel, CommissionPaymentModel};
use commission_core_db::repository::FindByFilter;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::finish;
use crate::postgres_repositories::{CommissionRepositories, PostgresRepositories};

/// Read side of the commission ledger: line item queries and reconciliation
/// of what partners earned against what they were paid.
pub struct CommissionLedgerService {
    repos: Arc<PostgresRepositories>,
}

impl CommissionLedgerService {
    pub fn new(repos: Arc<PostgresRepositories>) -> Self {
        Self { repos }
    }

    pub async fn line_items(&self, filter: CommissionFilter) -> ApiResult<Vec<CommissionModel>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::line_items_in(&uow, filter).await;
        finish(uow, result).await
    }

    pub async fn line_items_in(
        uow: &CommissionRepositories,
        filter: CommissionFilter,
    ) -> ApiResult<Vec<CommissionModel>> {
        Ok(uow.commission_repository.find_by_filter(&filter).await?)
    }

    /// Owed minus paid for one partner and period. Negative on overpayment.
    pub async fn outstanding_balance(
        &self,
        partner_id: Uuid,
        period: Period,
        basis: BalanceBasis,
    ) -> ApiResult<Decimal> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::outstanding_balance_in(&uow, partner_id, period, basis).await;
        finish(uow, result).await
    }

    pub async fn outstanding_balance_in(
        uow: &CommissionRepositories,
        partner_id: Uuid,
        period: Period,
        basis: BalanceBasis,
    ) -> ApiResult<Decimal> {
        let (line_items, payments) = fetch(
            uow,
            CommissionFilter::for_partner(partner_id).in_period(period),
            PaymentFilter {
                partner_id: Some(partner_id),
                period: Some(period),
            },
        )
        .await?;
        let balance = outstanding_balance(partner_id, period, &line_items, &payments, basis);
        debug!(%partner_id, %period, ?basis, %balance, "outstanding balance computed");
        Ok(balance)
    }

    pub async fn partner_statement(&self, partner_id: Uuid) -> ApiResult<Vec<PeriodStatement>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::partner_statement_in(&uow, partner_id).await;
        finish(uow, result).await
    }

    pub async fn partner_statement_in(
        uow: &CommissionRepositories,
        partner_id: Uuid,
    ) -> ApiResult<Vec<PeriodStatement>> {
        let (line_items, payments) = fetch(
            uow,
            CommissionFilter::for_partner(partner_id),
            PaymentFilter {
                partner_id: Some(partner_id),
                period: None,
            },
        )
        .await?;
        Ok(partner_statement(partner_id, &line_items, &payments))
    }

    pub async fn period_summary(&self, period: Period) -> ApiResult<Vec<PartnerBalance>> {
        let uow = self.repos.create_all_repositories().await?;
        let result = Self::period_summary_in(&uow, period).await;
        finish(uow, result).await
    }

    pub async fn period_summary_in(
        uow: &CommissionRepositories,
        period: Period,
    ) -> ApiResult<Vec<PartnerBalance>> {
        let (line_items, payments) = fetch(
            uow,
            CommissionFilter::default().in_period(period),
            PaymentFilter {
                partner_id: None,
                period: Some(period),
            },
        )
        .await?;
        Ok(period_summary(period, &line_items, &payments))
    }
}

async fn fetch(
    uow: &CommissionRepositories,
    line_item_filter: CommissionFilter,
    payment_filter: PaymentFilter,
) -> ApiResult<(Vec<CommissionModel>, Vec<CommissionPaymentModel>)> {
    let line_items = uow.commission_repository.find_by_filter(&line_item_filter).await?;
    let payments = uow
        .commission_payment_repository
        .find_by_filter(&payment_filter)
        .await?;
    Ok((line_items, payments))
}
