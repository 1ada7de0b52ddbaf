pub mod amortization;
pub mod recording;

pub use amortization::{monthly_payment, Installment, RepaymentSchedule};
pub use recording::{apply_next_payment, mark_overdue, PaymentReceipt};
