pub mod json;
pub mod memory;

use crate::errors::Result;
use crate::loan::Loan;
use crate::property::Property;
use crate::types::{LoanId, PropertyId};

pub use json::{JsonLoanRepository, JsonPropertyRepository};
pub use memory::{InMemoryLoanRepository, InMemoryPropertyRepository};

/// storage seam for properties; implementations are injected into the
/// platform rather than reached through module-level state
pub trait PropertyRepository {
    fn insert(&mut self, property: Property) -> Result<()>;
    fn update(&mut self, property: &Property) -> Result<()>;
    fn by_id(&self, id: &PropertyId) -> Result<Option<Property>>;
    fn by_owner(&self, owner: &str) -> Result<Vec<Property>>;
    fn all(&self) -> Result<Vec<Property>>;
}

/// storage seam for loans. encumbrance is always recomputed from
/// `by_property`, never cached alongside the records
pub trait LoanRepository {
    fn insert(&mut self, loan: Loan) -> Result<()>;
    fn update(&mut self, loan: &Loan) -> Result<()>;
    fn by_id(&self, id: &LoanId) -> Result<Option<Loan>>;
    fn by_borrower(&self, borrower: &str) -> Result<Vec<Loan>>;
    fn by_property(&self, property_id: &PropertyId) -> Result<Vec<Loan>>;
    fn all(&self) -> Result<Vec<Loan>>;
}
