use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::types::{LoanId, PaymentStatus};

/// single scheduled installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: DateTime<Utc>,
    pub amount: Money,
    pub status: PaymentStatus,
}

/// full repayment schedule for a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub loan_id: LoanId,
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub start_date: DateTime<Utc>,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub installments: Vec<Installment>,
}

impl RepaymentSchedule {
    /// generate the schedule: one installment per month, first due one
    /// month after the start date, all pending
    pub fn generate(
        loan_id: LoanId,
        principal: Money,
        annual_rate: Rate,
        term_months: u32,
        start_date: DateTime<Utc>,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LendingError::InvalidLoanAmount { amount: principal });
        }
        if term_months == 0 {
            return Err(LendingError::InvalidTerm {
                months: term_months,
            });
        }
        if annual_rate.as_decimal() < Decimal::ZERO || annual_rate.as_decimal() > Decimal::ONE {
            return Err(LendingError::InvalidInterestRate { rate: annual_rate });
        }

        let payment = monthly_payment(principal, annual_rate, term_months);
        let monthly_rate = annual_rate.monthly_rate().as_decimal();

        let mut installments = Vec::with_capacity(term_months as usize);
        let mut balance = principal.as_decimal();

        for i in 1..=term_months {
            let due_date = start_date
                .checked_add_months(Months::new(i))
                .ok_or_else(|| LendingError::CalculationError {
                    message: format!("schedule date overflow at installment {}", i),
                })?;

            let mut amount = payment;

            balance = balance * (Decimal::ONE + monthly_rate) - payment.as_decimal();

            // the final installment absorbs residual rounding so the
            // balance retires exactly
            if i == term_months && balance.abs() < Decimal::ONE {
                amount = Money::from_decimal(payment.as_decimal() + balance);
                balance = Decimal::ZERO;
            }

            installments.push(Installment {
                number: i,
                due_date,
                amount,
                status: PaymentStatus::Pending,
            });
        }

        let total_payment = installments
            .iter()
            .map(|p| p.amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        Ok(Self {
            loan_id,
            principal,
            annual_rate,
            term_months,
            start_date,
            monthly_payment: payment,
            total_payment,
            installments,
        })
    }

    /// first installment still owed, in date order
    pub fn next_pending(&self) -> Option<&Installment> {
        self.installments
            .iter()
            .find(|p| p.status.is_outstanding())
    }

    /// sum of paid installments; derived, never stored
    pub fn paid_amount(&self) -> Money {
        self.installments
            .iter()
            .filter(|p| p.status == PaymentStatus::Paid)
            .map(|p| p.amount)
            .fold(Money::ZERO, |acc, x| acc + x)
    }

    /// repayment progress as a fraction of principal
    pub fn progress(&self) -> Rate {
        if !self.principal.is_positive() {
            return Rate::ZERO;
        }
        Rate::from_decimal(self.paid_amount().as_decimal() / self.principal.as_decimal())
    }

    /// count of installments still owed
    pub fn remaining(&self) -> u32 {
        self.installments
            .iter()
            .filter(|p| p.status.is_outstanding())
            .count() as u32
    }

    /// all installments paid
    pub fn is_settled(&self) -> bool {
        self.installments
            .iter()
            .all(|p| p.status == PaymentStatus::Paid)
    }
}

/// standard annuity payment: P * r * (1+r)^n / ((1+r)^n - 1),
/// degrading to P / n when the rate is zero
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate.monthly_rate().as_decimal();

    if monthly_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }

    let r = monthly_rate;
    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..term_months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_thirty_year_mortgage_payment() {
        // 300k at 3.5% over 360 months
        let payment = monthly_payment(
            Money::from_major(300_000),
            Rate::from_percent(dec!(3.5)),
            360,
        );
        assert_eq!(payment.round_dp(2), Money::from_decimal(dec!(1347.13)));
    }

    #[test]
    fn test_schedule_shape() {
        let schedule = RepaymentSchedule::generate(
            Uuid::new_v4(),
            Money::from_major(300_000),
            Rate::from_percent(dec!(3.5)),
            360,
            start(),
        )
        .unwrap();

        assert_eq!(schedule.installments.len(), 360);
        assert!(schedule
            .installments
            .iter()
            .all(|p| p.status == PaymentStatus::Pending));

        // first installment lands one month after the start date
        assert_eq!(
            schedule.installments[0].due_date,
            Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap()
        );

        // strictly increasing dates, one calendar month apart
        for pair in schedule.installments.windows(2) {
            assert!(pair[1].due_date > pair[0].due_date);
            assert_eq!(
                pair[0].due_date.checked_add_months(Months::new(1)).unwrap(),
                pair[1].due_date
            );
        }
    }

    #[test]
    fn test_schedule_retires_principal_plus_interest() {
        let principal = Money::from_major(300_000);
        let schedule = RepaymentSchedule::generate(
            Uuid::new_v4(),
            principal,
            Rate::from_percent(dec!(3.5)),
            360,
            start(),
        )
        .unwrap();

        // total repaid exceeds principal by the effective interest
        assert!(schedule.total_payment > principal);

        // simulating the balance against the schedule ends at zero
        let r = Rate::from_percent(dec!(3.5)).monthly_rate().as_decimal();
        let mut balance = principal.as_decimal();
        for p in &schedule.installments {
            balance = balance * (Decimal::ONE + r) - p.amount.as_decimal();
        }
        assert!(balance.abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_degrades_to_straight_line() {
        let schedule = RepaymentSchedule::generate(
            Uuid::new_v4(),
            Money::from_major(12_000),
            Rate::ZERO,
            12,
            start(),
        )
        .unwrap();

        assert_eq!(schedule.monthly_payment, Money::from_major(1_000));
        assert_eq!(schedule.total_payment, Money::from_major(12_000));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let id = Uuid::new_v4();
        assert!(matches!(
            RepaymentSchedule::generate(id, Money::ZERO, Rate::ZERO, 12, start()),
            Err(LendingError::InvalidLoanAmount { .. })
        ));
        assert!(matches!(
            RepaymentSchedule::generate(id, Money::from_major(1000), Rate::ZERO, 0, start()),
            Err(LendingError::InvalidTerm { .. })
        ));
        assert!(matches!(
            RepaymentSchedule::generate(
                id,
                Money::from_major(1000),
                Rate::from_decimal(dec!(1.5)),
                12,
                start()
            ),
            Err(LendingError::InvalidInterestRate { .. })
        ));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let id = Uuid::new_v4();
        let a = RepaymentSchedule::generate(
            id,
            Money::from_major(50_000),
            Rate::from_percentage(5),
            60,
            start(),
        )
        .unwrap();
        let b = RepaymentSchedule::generate(
            id,
            Money::from_major(50_000),
            Rate::from_percentage(5),
            60,
            start(),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
