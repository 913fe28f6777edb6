use crate::engine::{round_money, round_rate};
use crate::models::{ClientModel, SaleModel};

/// Refresh the derived fields of a sale from its client as it is right now.
///
/// Runs on every sale save, so editing a client changes what the next save
/// of any of its sales records, but never rewrites sales nobody re-saves.
pub fn apply_commission_snapshot(sale: &mut SaleModel, client: &ClientModel) {
    let fraction = client.total_commission_percentage;
    sale.service_label = client.service.clone();
    sale.commission_rate = round_rate(fraction);
    sale.commission_amount = round_money(fraction * sale.sale_amount);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures;
    use crate::models::CommissionShareModel;
    use commission_core_api::PaymentStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_snapshot_without_commission() {
        let client = fixtures::client(vec![]);
        let mut sale = fixtures::sale(&client, dec!(1000.00), fixtures::date(2024, 3, 15), PaymentStatus::Pending);
        apply_commission_snapshot(&mut sale, &client);
        assert_eq!(sale.commission_rate, Decimal::ZERO);
        assert_eq!(sale.commission_amount, Decimal::ZERO);
        assert_eq!(sale.service_label.as_str(), "SEO");
    }

    #[test]
    fn test_snapshot_uses_client_total() {
        let client = fixtures::client(vec![
            CommissionShareModel::new(1, Some(Uuid::new_v4()), Some(dec!(0.10))),
            CommissionShareModel::new(2, Some(Uuid::new_v4()), Some(dec!(0.05))),
        ]);
        let mut sale = fixtures::sale(&client, dec!(1000.00), fixtures::date(2024, 3, 15), PaymentStatus::Paid);
        apply_commission_snapshot(&mut sale, &client);
        assert_eq!(sale.commission_rate, dec!(0.15));
        assert_eq!(sale.commission_amount, dec!(150.00));
    }

    #[test]
    fn test_rate_is_rounded_to_four_places_but_amount_uses_full_fraction() {
        let client = fixtures::client(vec![CommissionShareModel::new(
            1,
            Some(Uuid::new_v4()),
            Some(dec!(0.123456)),
        )]);
        let mut sale = fixtures::sale(&client, dec!(1000.00), fixtures::date(2024, 3, 15), PaymentStatus::Paid);
        apply_commission_snapshot(&mut sale, &client);
        assert_eq!(sale.commission_rate, dec!(0.1235));
        assert_eq!(sale.commission_amount, dec!(123.46));
    }
}
