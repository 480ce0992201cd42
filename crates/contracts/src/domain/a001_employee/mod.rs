pub mod aggregate;

pub use aggregate::{Employee, EmployeeDto, EmployeeId};
