use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::loan::Loan;

/// sum of loan amounts currently committed against a property:
/// pending, approved and active loans encumber; terminal ones release
pub fn encumbered_amount<'a, I>(loans: I) -> Money
where
    I: IntoIterator<Item = &'a Loan>,
{
    loans
        .into_iter()
        .filter(|loan| loan.status.is_encumbering())
        .map(|loan| loan.amount)
        .fold(Money::ZERO, |acc, x| acc + x)
}

/// equity still available for borrowing against a property,
/// floored at zero when it is fully encumbered
pub fn available_equity(property_value: Money, loans: &[Loan]) -> Result<Money> {
    if !property_value.is_positive() {
        return Err(LendingError::InvalidPropertyValue {
            value: property_value,
        });
    }

    let encumbered = encumbered_amount(loans);
    Ok((property_value - encumbered).max(Money::ZERO))
}
