use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};

/// lending policy applied when sizing a loan against a property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingPolicy {
    /// hard ceiling on loan amount as a fraction of property value
    pub ltv_cap: Rate,
    /// ratio used when suggesting an amount to the applicant
    pub suggested_ltv: Rate,
}

impl Default for UnderwritingPolicy {
    fn default() -> Self {
        Self {
            ltv_cap: Rate::from_percentage(80),
            suggested_ltv: Rate::from_percentage(70),
        }
    }
}

impl UnderwritingPolicy {
    pub fn new(ltv_cap: Rate, suggested_ltv: Rate) -> Self {
        Self {
            ltv_cap,
            suggested_ltv,
        }
    }

    /// maximum amount lendable against the property: two independent
    /// ceilings, equity exhaustion and the LTV cap on total value, with
    /// the lower one binding
    pub fn max_loan_amount(&self, property_value: Money, available_equity: Money) -> Money {
        if !available_equity.is_positive() {
            return Money::ZERO;
        }

        let ltv_ceiling = Money::from_decimal(
            property_value.as_decimal() * self.ltv_cap.as_decimal(),
        );

        available_equity.min(ltv_ceiling)
    }

    /// amount pre-filled on the application form: the lesser of the
    /// maximum and the suggested fraction of total value
    pub fn suggest_amount(&self, property_value: Money, available_equity: Money) -> Money {
        let maximum = self.max_loan_amount(property_value, available_equity);
        let suggested = Money::from_decimal(
            property_value.as_decimal() * self.suggested_ltv.as_decimal(),
        );
        maximum.min(suggested)
    }

    /// validate a requested amount against the computed maximum.
    /// never clamps: an excessive request is rejected with the maximum
    /// attached so the caller can surface it
    pub fn validate_request(
        &self,
        requested: Money,
        property_value: Money,
        available_equity: Money,
    ) -> Result<()> {
        if !requested.is_positive() {
            return Err(LendingError::InvalidLoanAmount { amount: requested });
        }

        let maximum = self.max_loan_amount(property_value, available_equity);
        if requested > maximum {
            return Err(LendingError::EquityExceeded { requested, maximum });
        }

        Ok(())
    }
}

/// loan-to-value of a requested amount, as a percentage of property value
pub fn loan_to_value(amount: Money, property_value: Money) -> Result<Rate> {
    if !property_value.is_positive() {
        return Err(LendingError::InvalidPropertyValue {
            value: property_value,
        });
    }

    Ok(Rate::from_decimal(
        amount.as_decimal() / property_value.as_decimal(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equity_ceiling_binds() {
        // value 500000, 300000 already borrowed: equity 200000 is below
        // the 80% cap of 400000
        let policy = UnderwritingPolicy::default();
        let max =
            policy.max_loan_amount(Money::from_major(500_000), Money::from_major(200_000));
        assert_eq!(max, Money::from_major(200_000));
    }

    #[test]
    fn test_ltv_cap_binds_on_unencumbered_property() {
        let policy = UnderwritingPolicy::default();
        let max =
            policy.max_loan_amount(Money::from_major(500_000), Money::from_major(500_000));
        assert_eq!(max, Money::from_major(400_000));
    }

    #[test]
    fn test_zero_equity_means_zero_maximum() {
        let policy = UnderwritingPolicy::default();
        assert_eq!(
            policy.max_loan_amount(Money::from_major(500_000), Money::ZERO),
            Money::ZERO
        );
    }

    #[test]
    fn test_suggestion_uses_lower_ratio() {
        let policy = UnderwritingPolicy::default();
        let suggested =
            policy.suggest_amount(Money::from_major(500_000), Money::from_major(500_000));
        assert_eq!(suggested, Money::from_major(350_000));

        // a low equity position caps the suggestion too
        let suggested =
            policy.suggest_amount(Money::from_major(500_000), Money::from_major(100_000));
        assert_eq!(suggested, Money::from_major(100_000));
    }

    #[test]
    fn test_excessive_request_rejected_with_maximum() {
        let policy = UnderwritingPolicy::default();
        let result = policy.validate_request(
            Money::from_major(250_000),
            Money::from_major(500_000),
            Money::from_major(200_000),
        );

        match result {
            Err(LendingError::EquityExceeded { requested, maximum }) => {
                assert_eq!(requested, Money::from_major(250_000));
                assert_eq!(maximum, Money::from_major(200_000));
            }
            other => panic!("expected EquityExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_request_within_maximum_passes() {
        let policy = UnderwritingPolicy::default();
        assert!(policy
            .validate_request(
                Money::from_major(200_000),
                Money::from_major(500_000),
                Money::from_major(200_000),
            )
            .is_ok());
    }

    #[test]
    fn test_fully_borrowed_property_rejects_any_amount() {
        let policy = UnderwritingPolicy::default();
        let result = policy.validate_request(
            Money::from_major(1),
            Money::from_major(500_000),
            Money::ZERO,
        );
        assert!(matches!(result, Err(LendingError::EquityExceeded { .. })));
    }

    #[test]
    fn test_loan_to_value_percentage() {
        let ltv = loan_to_value(Money::from_major(300_000), Money::from_major(500_000)).unwrap();
        assert_eq!(ltv.as_percentage(), dec!(60));

        assert!(loan_to_value(Money::from_major(1), Money::ZERO).is_err());
    }
}
