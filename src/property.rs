use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::types::{PropertyId, PropertyStatus, TokenId};

/// a registered property offered as loan collateral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub value: Money,
    pub status: PropertyStatus,
    pub token_id: Option<TokenId>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// register a new property in pending status
    pub fn register(
        owner: String,
        title: String,
        description: String,
        location: String,
        value: Money,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if !value.is_positive() {
            return Err(LendingError::InvalidPropertyValue { value });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            title,
            description,
            location,
            value,
            status: PropertyStatus::Pending,
            token_id: None,
            created_at,
        })
    }

    /// approve for tokenization; only valid from pending
    pub fn approve(&mut self) -> Result<()> {
        if self.status != PropertyStatus::Pending {
            return Err(LendingError::InvalidPropertyStatus {
                current: self.status,
                expected: PropertyStatus::Pending,
            });
        }
        self.status = PropertyStatus::Approved;
        Ok(())
    }

    /// reject during review; only valid from pending
    pub fn reject(&mut self) -> Result<()> {
        if self.status != PropertyStatus::Pending {
            return Err(LendingError::InvalidPropertyStatus {
                current: self.status,
                expected: PropertyStatus::Pending,
            });
        }
        self.status = PropertyStatus::Rejected;
        Ok(())
    }

    /// record the minted token; only valid from approved
    pub fn tokenize(&mut self, token_id: TokenId) -> Result<()> {
        if self.status != PropertyStatus::Approved {
            return Err(LendingError::InvalidPropertyStatus {
                current: self.status,
                expected: PropertyStatus::Approved,
            });
        }
        self.status = PropertyStatus::Tokenized;
        self.token_id = Some(token_id);
        Ok(())
    }

    /// check loan eligibility
    pub fn is_loan_eligible(&self) -> bool {
        self.status.is_loan_eligible() && self.token_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered_property() -> Property {
        Property::register(
            "0x123".to_string(),
            "Downtown Apartment".to_string(),
            "A two-bedroom apartment".to_string(),
            "123 Main St, New York, NY".to_string(),
            Money::from_major(500_000),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_register_starts_pending() {
        let property = registered_property();
        assert_eq!(property.status, PropertyStatus::Pending);
        assert!(property.token_id.is_none());
        assert!(!property.is_loan_eligible());
    }

    #[test]
    fn test_register_rejects_non_positive_value() {
        let result = Property::register(
            "0x123".to_string(),
            "Empty Lot".to_string(),
            String::new(),
            String::new(),
            Money::ZERO,
            Utc::now(),
        );
        assert!(matches!(
            result,
            Err(LendingError::InvalidPropertyValue { .. })
        ));
    }

    #[test]
    fn test_approval_then_tokenization() {
        let mut property = registered_property();
        property.approve().unwrap();
        assert_eq!(property.status, PropertyStatus::Approved);

        property.tokenize(TokenId::new(1)).unwrap();
        assert_eq!(property.status, PropertyStatus::Tokenized);
        assert_eq!(property.token_id, Some(TokenId::new(1)));
        assert!(property.is_loan_eligible());
    }

    #[test]
    fn test_tokenize_requires_approval() {
        let mut property = registered_property();
        let result = property.tokenize(TokenId::new(1));
        assert!(matches!(
            result,
            Err(LendingError::InvalidPropertyStatus { .. })
        ));
    }

    #[test]
    fn test_rejected_property_stays_rejected() {
        let mut property = registered_property();
        property.reject().unwrap();
        assert_eq!(property.status, PropertyStatus::Rejected);
        assert!(property.approve().is_err());
    }
}
