pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AuthSettings, CampusSettings, EmailClientSettings, PostgresSettings, RedisSettings,
    ResetSettings,
};
