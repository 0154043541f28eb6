pub mod records;
pub mod repositories;
pub mod services;
