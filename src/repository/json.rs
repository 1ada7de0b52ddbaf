use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{LendingError, Result};
use crate::loan::Loan;
use crate::property::Property;
use crate::repository::{LoanRepository, PropertyRepository};
use crate::types::{LoanId, PropertyId};

fn storage_error(context: &str, err: impl std::fmt::Display) -> LendingError {
    LendingError::StorageError {
        message: format!("{}: {}", context, err),
    }
}

fn load<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(path).map_err(|e| storage_error("reading store file", e))?;
    serde_json::from_str(&contents).map_err(|e| storage_error("decoding store file", e))
}

fn persist<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let contents = serde_json::to_string_pretty(records)
        .map_err(|e| storage_error("encoding store file", e))?;
    fs::write(path, contents).map_err(|e| storage_error("writing store file", e))
}

/// property store persisted to a json file; the whole collection is
/// rewritten on each mutation
#[derive(Debug)]
pub struct JsonPropertyRepository {
    path: PathBuf,
    properties: Vec<Property>,
}

impl JsonPropertyRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let properties = load(&path)?;
        Ok(Self { path, properties })
    }
}

impl PropertyRepository for JsonPropertyRepository {
    fn insert(&mut self, property: Property) -> Result<()> {
        self.properties.push(property);
        persist(&self.path, &self.properties)
    }

    fn update(&mut self, property: &Property) -> Result<()> {
        let slot = self
            .properties
            .iter_mut()
            .find(|p| p.id == property.id)
            .ok_or(LendingError::PropertyNotFound { id: property.id })?;
        *slot = property.clone();
        persist(&self.path, &self.properties)
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

/// loan store persisted to a json file
#[derive(Debug)]
pub struct JsonLoanRepository {
    path: PathBuf,
    loans: Vec<Loan>,
}

impl JsonLoanRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loans = load(&path)?;
        Ok(Self { path, loans })
    }
}

impl LoanRepository for JsonLoanRepository {
    fn insert(&mut self, loan: Loan) -> Result<()> {
        self.loans.push(loan);
        persist(&self.path, &self.loans)
    }

    fn update(&mut self, loan: &Loan) -> Result<()> {
        let slot = self
            .loans
            .iter_mut()
            .find(|l| l.id == loan.id)
            .ok_or(LendingError::LoanNotFound { id: loan.id })?;
        *slot = loan.clone();
        persist(&self.path, &self.loans)
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
