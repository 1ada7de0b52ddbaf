use chrono::{DateTime, Utc};

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::payments::amortization::RepaymentSchedule;
use crate::types::PaymentStatus;

/// outcome of applying a payment to a schedule
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub installment_number: u32,
    pub due_date: DateTime<Utc>,
    pub scheduled_amount: Money,
    pub amount_paid: Money,
    pub schedule_settled: bool,
}

/// apply a payment to the first installment still owed, in date order.
/// the amount is recorded but not validated against the scheduled figure;
/// any received payment settles the next installment.
pub fn apply_next_payment(
    schedule: &mut RepaymentSchedule,
    amount_paid: Money,
) -> Result<PaymentReceipt> {
    let loan_id = schedule.loan_id;

    let installment = schedule
        .installments
        .iter_mut()
        .find(|p| p.status.is_outstanding())
        .ok_or(LendingError::ScheduleSettled { loan_id })?;

    installment.status = PaymentStatus::Paid;

    let receipt = PaymentReceipt {
        installment_number: installment.number,
        due_date: installment.due_date,
        scheduled_amount: installment.amount,
        amount_paid,
        schedule_settled: false,
    };

    Ok(PaymentReceipt {
        schedule_settled: schedule.is_settled(),
        ..receipt
    })
}

/// flip pending installments whose due date has passed to overdue,
/// returning the numbers of the installments flipped
pub fn mark_overdue(schedule: &mut RepaymentSchedule, now: DateTime<Utc>) -> Vec<u32> {
    schedule
        .installments
        .iter_mut()
        .filter(|p| p.status == PaymentStatus::Pending && p.due_date < now)
        .map(|p| {
            p.status = PaymentStatus::Overdue;
            p.number
        })
        .collect()
}
