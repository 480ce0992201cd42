pub mod common;

pub mod a001_employee;
pub mod a002_training_category;
pub mod a003_training;
