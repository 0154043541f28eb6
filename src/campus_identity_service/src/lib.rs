pub mod helpers;
pub mod identity_service;
pub mod sweeper;
pub mod telemetry;

pub use helpers::{
    configure_postgresql, configure_redis, get_postgres_pool, get_redis_client, jwt_config,
    reset_policy,
};
pub use identity_service::IdentityService;
pub use sweeper::spawn_reset_sweeper;
pub use telemetry::init_tracing;
