// Справочники
pub mod a001_employee;
pub mod a002_training_category;

// Документы
pub mod a003_training;

// Системные
pub mod logs;
