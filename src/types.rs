use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a property
pub type PropertyId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// on-chain token identifier assigned when a property is tokenized
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct TokenId(u128);

impl TokenId {
    pub fn new(id: u128) -> Self {
        TokenId(id)
    }

    /// decode from a raw 32-byte indexed log topic, hex encoded
    pub fn from_hex_topic(topic: &str) -> Option<Self> {
        let digits = topic.trim().trim_start_matches("0x");
        if digits.is_empty() {
            return None;
        }
        // a u128 holds 32 hex digits; reject anything wider that has
        // significant bits beyond that
        let (overflow, tail) = if digits.len() > 32 {
            digits.split_at(digits.len() - 32)
        } else {
            ("", digits)
        };
        if overflow.chars().any(|c| c != '0') {
            return None;
        }
        u128::from_str_radix(tail, 16).ok().map(TokenId)
    }

    pub fn value(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// property lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyStatus {
    /// registered, awaiting review
    Pending,
    /// approved for tokenization
    Approved,
    /// rejected during review
    Rejected,
    /// token minted, loan-eligible
    Tokenized,
}

impl PropertyStatus {
    /// only tokenized properties can back a loan
    pub fn is_loan_eligible(&self) -> bool {
        matches!(self, PropertyStatus::Tokenized)
    }
}

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// requested, awaiting review
    Pending,
    /// approved, not yet disbursed
    Approved,
    /// disbursed and repaying
    Active,
    /// fully repaid
    Repaid,
    /// written off
    Defaulted,
}

impl LoanStatus {
    /// statuses that count against a property's available equity
    pub fn is_encumbering(&self) -> bool {
        matches!(
            self,
            LoanStatus::Pending | LoanStatus::Approved | LoanStatus::Active
        )
    }

    /// terminal statuses release their encumbrance
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Repaid | LoanStatus::Defaulted)
    }
}

/// status of a single scheduled installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    /// pending and overdue installments are still owed
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encumbering_statuses() {
        assert!(LoanStatus::Pending.is_encumbering());
        assert!(LoanStatus::Approved.is_encumbering());
        assert!(LoanStatus::Active.is_encumbering());
        assert!(!LoanStatus::Repaid.is_encumbering());
        assert!(!LoanStatus::Defaulted.is_encumbering());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(LoanStatus::Repaid.is_terminal());
        assert!(LoanStatus::Defaulted.is_terminal());
        assert!(!LoanStatus::Active.is_terminal());
    }

    #[test]
    fn test_token_id_from_hex_topic() {
        assert_eq!(TokenId::from_hex_topic("0x2a"), Some(TokenId::new(42)));
        assert_eq!(
            TokenId::from_hex_topic(
                "0x0000000000000000000000000000000000000000000000000000000000000007"
            ),
            Some(TokenId::new(7))
        );
        assert_eq!(TokenId::from_hex_topic(""), None);
        assert_eq!(TokenId::from_hex_topic("0xzz"), None);
        // significant bits beyond 128 are rejected, not truncated
        assert_eq!(
            TokenId::from_hex_topic(
                "0x0000000000000000000000000001000000000000000000000000000000000000"
            ),
            None
        );
    }

    #[test]
    fn test_only_tokenized_is_loan_eligible() {
        assert!(PropertyStatus::Tokenized.is_loan_eligible());
        assert!(!PropertyStatus::Pending.is_loan_eligible());
        assert!(!PropertyStatus::Approved.is_loan_eligible());
        assert!(!PropertyStatus::Rejected.is_loan_eligible());
    }
}
