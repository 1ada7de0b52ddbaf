pub mod equity;
pub mod policy;

pub use equity::{available_equity, encumbered_amount};
pub use policy::{loan_to_value, UnderwritingPolicy};
