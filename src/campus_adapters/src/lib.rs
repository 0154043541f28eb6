pub mod config;
pub mod crypto;
pub mod email;
pub mod persistence;
pub mod time;
