use chrono::{NaiveDate, SubsecRound, Utc};
use commission_core_api::{PaymentStatus, Period};
use commission_core_db::models::{
    audit::AuditLogModel,
    client::{ClientModel, CommissionShareModel},
    commission::CommissionPaymentModel,
    partner::PartnerModel,
    sale::SaleModel,
};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn create_test_audit_log() -> AuditLogModel {
    AuditLogModel::new(Uuid::new_v4())
}

pub fn create_test_partner(name: &str) -> PartnerModel {
    PartnerModel {
        id: Uuid::new_v4(),
        name: HeaplessString::try_from(name).unwrap(),
        phone: Some(HeaplessString::try_from("5512345678").unwrap()),
        email: None,
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}

pub fn create_test_client(shares: Vec<CommissionShareModel>) -> ClientModel {
    let mut client = ClientModel {
        id: Uuid::new_v4(),
        name: HeaplessString::try_from("TEST CLIENT").unwrap(),
        service: HeaplessString::try_from("SEO").unwrap(),
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
    client.recompute_total_commission();
    client
}

pub fn create_test_sale(client: &ClientModel, amount: Decimal, status: PaymentStatus) -> SaleModel {
    SaleModel {
        id: Uuid::new_v4(),
        client_id: client.id,
        sale_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        sale_amount: amount,
        payment_status: status,
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

pub fn create_test_payment(partner_id: Uuid, period: Period, amount: Decimal) -> CommissionPaymentModel {
    CommissionPaymentModel {
        id: Uuid::new_v4(),
        partner_id,
        period_month: period.month_i32(),
        period_year: period.year,
        amount,
        payment_date: period.next().first_day(),
        comment: None,
        created_at: Utc::now().trunc_subsecs(6),
        antecedent_hash: 0,
        antecedent_audit_log_id: Uuid::nil(),
        hash: 0,
        audit_log_id: None,
    }
}
