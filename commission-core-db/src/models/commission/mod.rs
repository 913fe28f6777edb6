pub mod commission;
pub mod commission_payment;

pub use commission::CommissionModel;
pub use commission_payment::CommissionPaymentModel;
