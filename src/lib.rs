pub mod chain;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod payments;
pub mod platform;
pub mod property;
pub mod repository;
pub mod types;
pub mod underwriting;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LendingError, Result};
pub use events::{Event, EventStore};
pub use chain::{
    recover_token_id, MintReceipt, RecoveredToken, RecoveryStrategy, TokenChain, TokenLog,
};
pub use loan::Loan;
pub use payments::{
    apply_next_payment, mark_overdue, monthly_payment, Installment, PaymentReceipt,
    RepaymentSchedule,
};
pub use platform::LendingPlatform;
pub use property::Property;
pub use repository::{
    InMemoryLoanRepository, InMemoryPropertyRepository, JsonLoanRepository,
    JsonPropertyRepository, LoanRepository, PropertyRepository,
};
pub use types::{LoanId, LoanStatus, PaymentStatus, PropertyId, PropertyStatus, TokenId};
pub use underwriting::{available_equity, loan_to_value, UnderwritingPolicy};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
