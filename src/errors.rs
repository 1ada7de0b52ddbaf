use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{LoanId, LoanStatus, PropertyId, PropertyStatus};

#[derive(Error, Debug)]
pub enum LendingError {
    #[error("invalid property value: {value}")]
    InvalidPropertyValue { value: Money },

    #[error("invalid loan amount: {amount}")]
    InvalidLoanAmount { amount: Money },

    #[error("invalid term: {months} months")]
    InvalidTerm { months: u32 },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate { rate: Rate },

    #[error("requested amount {requested} exceeds available equity: maximum {maximum}")]
    EquityExceeded { requested: Money, maximum: Money },

    #[error("no available equity on property {property_id}")]
    NoAvailableEquity { property_id: PropertyId },

    #[error("property not found: {id}")]
    PropertyNotFound { id: PropertyId },

    #[error("loan not found: {id}")]
    LoanNotFound { id: LoanId },

    #[error("property {id} is not tokenized: current status is {status:?}")]
    PropertyNotTokenized {
        id: PropertyId,
        status: PropertyStatus,
    },

    #[error("invalid property status: current {current:?}, expected {expected:?}")]
    InvalidPropertyStatus {
        current: PropertyStatus,
        expected: PropertyStatus,
    },

    #[error("invalid loan status: current {current:?}, expected {expected:?}")]
    InvalidLoanStatus {
        current: LoanStatus,
        expected: LoanStatus,
    },

    #[error("loan {loan_id} is already closed: {current:?}")]
    LoanClosed { loan_id: LoanId, current: LoanStatus },

    #[error("repayment schedule fully settled for loan {loan_id}")]
    ScheduleSettled { loan_id: LoanId },

    #[error("repayment schedule not generated for loan {loan_id}")]
    ScheduleMissing { loan_id: LoanId },

    #[error("token id undeterminable from transaction {transaction_hash}")]
    TokenIdUndeterminable { transaction_hash: String },

    #[error("chain error: {message}")]
    ChainError { message: String },

    #[error("storage error: {message}")]
    StorageError { message: String },

    #[error("calculation error: {message}")]
    CalculationError { message: String },
}

pub type Result<T> = std::result::Result<T, LendingError>;
