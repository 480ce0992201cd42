pub mod logger;
pub mod outcome;

pub use outcome::{OperationOutcome, Severity};
