pub mod filters;
pub mod payment_status;
pub mod percentage;
pub mod period;
pub mod requests;

pub use filters::{CommissionFilter, PaymentFilter, SaleFilter};
pub use payment_status::PaymentStatus;
pub use percentage::{format_percent, PercentageScale};
pub use period::{first_day_of_next_month, Period};
pub use requests::{
    ClientRequest, CommissionPaymentRequest, CommissionShareRequest, PartnerRequest, SaleRequest,
    MAX_COMMISSION_SHARES,
};
