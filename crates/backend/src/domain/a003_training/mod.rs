pub mod display_id;
pub mod repository;
pub mod service;
