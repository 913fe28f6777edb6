use std::collections::HashSet;

use commission_core_api::{
    format_percent, ApiError, ApiResult, CommissionShareRequest, PercentageScale, MAX_COMMISSION_SHARES,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::engine::scale_percentage;
use crate::models::{ClientModel, CommissionShareModel};

/// Sum of every share percentage that is set, partner or not. Zero when no
/// percentage is set.
pub fn total_commission_percentage(shares: &[CommissionShareModel]) -> Decimal {
    shares
        .iter()
        .filter_map(|share| share.percentage)
        .fold(Decimal::ZERO, |acc, pct| acc + pct)
}

/// Partners referenced by any share, configured or not. Sorted, no repeats.
pub fn referenced_partner_ids(shares: &[CommissionShareModel]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = shares.iter().filter_map(|share| share.partner_id).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Turn the ordered share input of a client form into share models.
///
/// Position `i` becomes slot `i + 1`. Blank percentage text is "not set";
/// anything else goes through the configured percentage scale.
pub fn build_commission_shares(
    requests: &[CommissionShareRequest],
    scale: PercentageScale,
) -> ApiResult<Vec<CommissionShareModel>> {
    if requests.len() > MAX_COMMISSION_SHARES {
        return Err(ApiError::validation(format!(
            "a client can have at most {MAX_COMMISSION_SHARES} commission shares"
        )));
    }
    requests
        .iter()
        .enumerate()
        .map(|(position, request)| {
            let percentage = match request.percentage.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => Some(scale_percentage(scale.parse(text)?)),
                _ => None,
            };
            Ok(CommissionShareModel::new(
                (position + 1) as i16,
                request.partner_id,
                percentage,
            ))
        })
        .collect()
}

/// Structural rules for a stored profile: at most ten shares, slot indices in
/// 1..=10 without repeats, fractions in [0, 1] and a total of at most 100%.
pub fn validate_commission_shares(shares: &[CommissionShareModel]) -> ApiResult<()> {
    if shares.len() > MAX_COMMISSION_SHARES {
        return Err(ApiError::validation(format!(
            "a client can have at most {MAX_COMMISSION_SHARES} commission shares"
        )));
    }

    let mut seen = HashSet::new();
    for share in shares {
        if share.slot_index < 1 || share.slot_index as usize > MAX_COMMISSION_SHARES {
            return Err(ApiError::validation(format!(
                "commission slot {} is out of range",
                share.slot_index
            )));
        }
        if !seen.insert(share.slot_index) {
            return Err(ApiError::validation(format!(
                "commission slot {} is used twice",
                share.slot_index
            )));
        }
        if let Some(pct) = share.percentage {
            if pct < Decimal::ZERO || pct > Decimal::ONE {
                return Err(ApiError::validation(format!(
                    "commission slot {} has percentage {pct} outside [0, 1]",
                    share.slot_index
                )));
            }
        }
    }

    let total = total_commission_percentage(shares);
    if total > Decimal::ONE {
        return Err(ApiError::validation(format!(
            "total commission {} exceeds 100% of the sale",
            format_percent(total, 2)
        )));
    }
    Ok(())
}

impl ClientModel {
    /// Keep shares in slot order and refresh the derived total.
    pub fn recompute_total_commission(&mut self) {
        self.commission_shares.sort_by_key(|share| share.slot_index);
        self.total_commission_percentage =
            scale_percentage(total_commission_percentage(&self.commission_shares));
    }

    /// Shares that produce a commission line item: `(slot, partner, fraction)`.
    pub fn configured_shares(&self) -> Vec<(i16, Uuid, Decimal)> {
        self.commission_shares
            .iter()
            .filter_map(|share| {
                share
                    .configured()
                    .map(|(partner_id, pct)| (share.slot_index, partner_id, pct))
            })
            .collect()
    }
}
