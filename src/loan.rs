use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::payments::{Installment, RepaymentSchedule};
use crate::types::{LoanId, LoanStatus, PropertyId, TokenId};

/// a loan collateralized by a tokenized property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub property_id: PropertyId,
    pub token_id: TokenId,
    pub borrower: String,
    pub amount: Money,
    pub interest_rate: Rate,
    pub term_months: u32,
    pub collateral_amount: Money,
    /// stamped at creation from amount / property value; not re-validated
    pub loan_to_value: Rate,
    pub status: LoanStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub schedule: Option<RepaymentSchedule>,
}

impl Loan {
    /// create a new loan request: pending status, no schedule yet
    #[allow(clippy::too_many_arguments)]
    pub fn request(
        property_id: PropertyId,
        token_id: TokenId,
        borrower: String,
        amount: Money,
        interest_rate: Rate,
        term_months: u32,
        collateral_amount: Money,
        loan_to_value: Rate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            token_id,
            borrower,
            amount,
            interest_rate,
            term_months,
            collateral_amount,
            loan_to_value,
            status: LoanStatus::Pending,
            start_date: None,
            schedule: None,
        }
    }

    /// approve the request; only valid from pending
    pub fn approve(&mut self) -> Result<()> {
        if self.status != LoanStatus::Pending {
            return Err(LendingError::InvalidLoanStatus {
                current: self.status,
                expected: LoanStatus::Pending,
            });
        }
        self.status = LoanStatus::Approved;
        Ok(())
    }

    /// activate the loan, generating its repayment schedule from the
    /// activation date; only valid from approved
    pub fn activate(&mut self, start_date: DateTime<Utc>) -> Result<&RepaymentSchedule> {
        if self.status != LoanStatus::Approved {
            return Err(LendingError::InvalidLoanStatus {
                current: self.status,
                expected: LoanStatus::Approved,
            });
        }

        let schedule = RepaymentSchedule::generate(
            self.id,
            self.amount,
            self.interest_rate,
            self.term_months,
            start_date,
        )?;

        self.status = LoanStatus::Active;
        self.start_date = Some(start_date);

        Ok(self.schedule.insert(schedule))
    }

    /// close out a fully repaid loan; only valid from active
    pub fn mark_repaid(&mut self) -> Result<()> {
        if self.status != LoanStatus::Active {
            return Err(LendingError::InvalidLoanStatus {
                current: self.status,
                expected: LoanStatus::Active,
            });
        }
        self.status = LoanStatus::Repaid;
        Ok(())
    }

    /// write the loan off; valid from any non-terminal status
    pub fn mark_defaulted(&mut self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(LendingError::LoanClosed {
                loan_id: self.id,
                current: self.status,
            });
        }
        self.status = LoanStatus::Defaulted;
        Ok(())
    }

    /// mutable access to the schedule, failing if not yet generated
    pub fn schedule_mut(&mut self) -> Result<&mut RepaymentSchedule> {
        let loan_id = self.id;
        self.schedule
            .as_mut()
            .ok_or(LendingError::ScheduleMissing { loan_id })
    }

    /// total repaid so far; derived from the schedule, never stored
    pub fn paid_amount(&self) -> Money {
        self.schedule
            .as_ref()
            .map(|s| s.paid_amount())
            .unwrap_or(Money::ZERO)
    }

    /// repayment progress as a fraction of principal
    pub fn repayment_progress(&self) -> Rate {
        self.schedule
            .as_ref()
            .map(|s| s.progress())
            .unwrap_or(Rate::ZERO)
    }

    /// next installment still owed
    pub fn next_payment(&self) -> Option<&Installment> {
        self.schedule.as_ref().and_then(|s| s.next_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn requested_loan() -> Loan {
        Loan::request(
            Uuid::new_v4(),
            TokenId::new(1),
            "0x123".to_string(),
            Money::from_major(300_000),
            Rate::from_percent(dec!(3.5)),
            360,
            Money::from_major(30_000),
            Rate::from_percentage(60),
        )
    }

    #[test]
    fn test_request_starts_pending_without_schedule() {
        let loan = requested_loan();
        assert_eq!(loan.status, LoanStatus::Pending);
        assert!(loan.schedule.is_none());
        assert!(loan.start_date.is_none());
        assert_eq!(loan.paid_amount(), Money::ZERO);
        assert!(loan.next_payment().is_none());
    }

    #[test]
    fn test_activation_generates_schedule() {
        let mut loan = requested_loan();
        loan.approve().unwrap();

        let start = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let schedule = loan.activate(start).unwrap();
        assert_eq!(schedule.installments.len(), 360);

        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.start_date, Some(start));
        assert_eq!(loan.next_payment().unwrap().number, 1);
    }

    #[test]
    fn test_activate_requires_approval() {
        let mut loan = requested_loan();
        let result = loan.activate(Utc::now());
        assert!(matches!(
            result,
            Err(LendingError::InvalidLoanStatus { .. })
        ));
    }

    #[test]
    fn test_terminal_statuses_are_final() {
        let mut loan = requested_loan();
        loan.approve().unwrap();
        loan.activate(Utc::now()).unwrap();
        loan.mark_repaid().unwrap();

        // a closed loan cannot be written off; the error names the
        // closing status rather than claiming a single expected one
        assert!(matches!(
            loan.mark_defaulted(),
            Err(LendingError::LoanClosed {
                current: LoanStatus::Repaid,
                ..
            })
        ));
        assert!(loan.approve().is_err());
    }

    #[test]
    fn test_default_from_pending() {
        let mut loan = requested_loan();
        loan.mark_defaulted().unwrap();
        assert_eq!(loan.status, LoanStatus::Defaulted);
    }
}
