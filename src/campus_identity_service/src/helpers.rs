use std::{sync::Arc, time::Duration};

use campus_adapters::{
    config::{AuthSettings, CampusSettings, ResetSettings},
    crypto::JwtConfig,
};
use campus_application::ResetPolicy;
use redis::{Client, RedisResult};
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::RwLock;

/// Connect to PostgreSQL and bring the role tables up to date.
pub async fn configure_postgresql(settings: &CampusSettings) -> color_eyre::eyre::Result<PgPool> {
    let pg_pool = get_postgres_pool(settings.postgres.url.expose_secret()).await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

/// Open a shared Redis connection for the ticket store.
pub fn configure_redis(
    settings: &CampusSettings,
) -> RedisResult<Arc<RwLock<redis::Connection>>> {
    let conn = get_redis_client(&settings.redis.host_name)?.get_connection()?;
    Ok(Arc::new(RwLock::new(conn)))
}

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}

/// Create a Redis client
///
/// # Arguments
/// * `redis_hostname` - Redis server hostname, optionally with a port
pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}

pub fn reset_policy(settings: &ResetSettings) -> ResetPolicy {
    ResetPolicy {
        code_ttl: chrono::Duration::minutes(settings.code_ttl_in_minutes),
        sweep_interval: Duration::from_secs(settings.sweep_interval_in_seconds),
        min_password_length: settings.min_password_length,
    }
}

pub fn jwt_config(settings: &AuthSettings) -> JwtConfig {
    JwtConfig {
        jwt_secret: settings.jwt_secret.clone(),
        token_ttl_in_seconds: settings.token_ttl_in_seconds,
    }
}
