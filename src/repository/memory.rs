use crate::errors::{LendingError, Result};
use crate::loan::Loan;
use crate::property::Property;
use crate::repository::{LoanRepository, PropertyRepository};
use crate::types::{LoanId, PropertyId};

/// in-memory property store; insertion order is preserved
#[derive(Debug, Default)]
pub struct InMemoryPropertyRepository {
    properties: Vec<Property>,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn insert(&mut self, property: Property) -> Result<()> {
        self.properties.push(property);
        Ok(())
    }

    fn update(&mut self, property: &Property) -> Result<()> {
        let slot = self
            .properties
            .iter_mut()
            .find(|p| p.id == property.id)
            .ok_or(LendingError::PropertyNotFound { id: property.id })?;
        *slot = property.clone();
        Ok(())
    }

    fn by_id(&self, id: &PropertyId) -> Result<Option<Property>> {
        Ok(self.properties.iter().find(|p| p.id == *id).cloned())
    }

    fn by_owner(&self, owner: &str) -> Result<Vec<Property>> {
        Ok(self
            .properties
            .iter()
            .filter(|p| p.owner.eq_ignore_ascii_case(owner))
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Property>> {
        Ok(self.properties.clone())
    }
}

/// in-memory loan store
#[derive(Debug, Default)]
pub struct InMemoryLoanRepository {
    loans: Vec<Loan>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn insert(&mut self, loan: Loan) -> Result<()> {
        self.loans.push(loan);
        Ok(())
    }

    fn update(&mut self, loan: &Loan) -> Result<()> {
        let slot = self
            .loans
            .iter_mut()
            .find(|l| l.id == loan.id)
            .ok_or(LendingError::LoanNotFound { id: loan.id })?;
        *slot = loan.clone();
        Ok(())
    }

    fn by_id(&self, id: &LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.iter().find(|l| l.id == *id).cloned())
    }

    fn by_borrower(&self, borrower: &str) -> Result<Vec<Loan>> {
        Ok(self
            .loans
            .iter()
            .filter(|l| l.borrower.eq_ignore_ascii_case(borrower))
            .cloned()
            .collect())
    }

    fn by_property(&self, property_id: &PropertyId) -> Result<Vec<Loan>> {
        Ok(self
            .loans
            .iter()
            .filter(|l| l.property_id == *property_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Loan>> {
        Ok(self.loans.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::types::TokenId;
    use chrono::Utc;
    use uuid::Uuid;

    fn property(owner: &str) -> Property {
        Property::register(
            owner.to_string(),
            "Beach House".to_string(),
            String::new(),
            "456 Ocean Ave, Miami, FL".to_string(),
            Money::from_major(1_200_000),
            Utc::now(),
        )
        .unwrap()
    }

    fn loan(property_id: PropertyId, borrower: &str) -> Loan {
        Loan::request(
            property_id,
            TokenId::new(1),
            borrower.to_string(),
            Money::from_major(100_000),
            Rate::from_percentage(5),
            120,
            Money::ZERO,
            Rate::from_percentage(60),
        )
    }

    #[test]
    fn test_property_lookup() {
        let mut repo = InMemoryPropertyRepository::new();
        let prop = property("0xAbC");
        let id = prop.id;
        repo.insert(prop).unwrap();

        assert!(repo.by_id(&id).unwrap().is_some());
        assert!(repo.by_id(&Uuid::new_v4()).unwrap().is_none());

        // owner lookup is case-insensitive, matching address semantics
        assert_eq!(repo.by_owner("0xabc").unwrap().len(), 1);
        assert_eq!(repo.by_owner("0xdef").unwrap().len(), 0);
    }

    #[test]
    fn test_property_update() {
        let mut repo = InMemoryPropertyRepository::new();
        let mut prop = property("0x123");
        repo.insert(prop.clone()).unwrap();

        prop.approve().unwrap();
        repo.update(&prop).unwrap();

        let stored = repo.by_id(&prop.id).unwrap().unwrap();
        assert_eq!(stored.status, prop.status);

        let unknown = property("0x456");
        assert!(matches!(
            repo.update(&unknown),
            Err(LendingError::PropertyNotFound { .. })
        ));
    }

    #[test]
    fn test_loans_by_property_and_borrower() {
        let mut repo = InMemoryLoanRepository::new();
        let prop_a = Uuid::new_v4();
        let prop_b = Uuid::new_v4();

        repo.insert(loan(prop_a, "0x123")).unwrap();
        repo.insert(loan(prop_a, "0x456")).unwrap();
        repo.insert(loan(prop_b, "0x123")).unwrap();

        assert_eq!(repo.by_property(&prop_a).unwrap().len(), 2);
        assert_eq!(repo.by_borrower("0x123").unwrap().len(), 2);
        assert_eq!(repo.all().unwrap().len(), 3);
    }
}
