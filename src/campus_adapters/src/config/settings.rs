use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{defaults, env, files};

#[derive(Debug, Clone, Deserialize)]
pub struct CampusSettings {
    pub postgres: PostgresSettings,
    pub redis: RedisSettings,
    pub auth: AuthSettings,
    pub reset: ResetSettings,
    pub email_client: EmailClientSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: Secret<String>,
    pub token_ttl_in_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetSettings {
    pub code_ttl_in_minutes: i64,
    pub sweep_interval_in_seconds: u64,
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_in_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

impl CampusSettings {
    /// Layers built-in defaults, `config/base.json`, `config/local.json` and
    /// `CAMPUS__*` environment variables, later sources winning.
    ///
    /// Secrets (`postgres.url`, `auth.jwt_secret`, `email_client.auth_token`)
    /// have no default and must come from a file or the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::builder()?
            .add_source(File::with_name(files::BASE).required(false))
            .add_source(File::with_name(files::LOCAL).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("redis.host_name", defaults::REDIS_HOST_NAME)?
            .set_default("auth.token_ttl_in_seconds", defaults::TOKEN_TTL_IN_SECONDS)?
            .set_default("reset.code_ttl_in_minutes", defaults::CODE_TTL_IN_MINUTES)?
            .set_default(
                "reset.sweep_interval_in_seconds",
                defaults::SWEEP_INTERVAL_IN_SECONDS,
            )?
            .set_default(
                "reset.min_password_length",
                defaults::MIN_PASSWORD_LENGTH as u64,
            )?
            .set_default("email_client.base_url", defaults::email_client::BASE_URL)?
            .set_default("email_client.sender", defaults::email_client::SENDER)?
            .set_default(
                "email_client.timeout_in_millis",
                defaults::email_client::TIMEOUT_IN_MILLIS,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use secrecy::ExposeSecret;

    fn from_json(json: &str) -> Result<CampusSettings, ConfigError> {
        CampusSettings::builder()?
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn defaults_fill_everything_but_secrets() {
        let settings = from_json(
            r#"{
                "postgres": { "url": "postgres://localhost/campus" },
                "auth": { "jwt_secret": "s3cr3t" },
                "email_client": { "auth_token": "token" }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.postgres.url.expose_secret(), "postgres://localhost/campus");
        assert_eq!(settings.redis.host_name, "127.0.0.1");
        assert_eq!(settings.auth.token_ttl_in_seconds, 600);
        assert_eq!(settings.reset.code_ttl_in_minutes, 15);
        assert_eq!(settings.reset.sweep_interval_in_seconds, 300);
        assert_eq!(settings.reset.min_password_length, 6);
        assert_eq!(settings.email_client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_jwt_secret_is_an_error() {
        let result = from_json(
            r#"{
                "postgres": { "url": "postgres://localhost/campus" },
                "email_client": { "auth_token": "token" }
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_json(
            r#"{
                "postgres": { "url": "postgres://localhost/campus" },
                "auth": { "jwt_secret": "s3cr3t", "token_ttl_in_seconds": 60 },
                "reset": { "code_ttl_in_minutes": 5 },
                "email_client": { "auth_token": "token", "sender": "it@campus.edu" }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.auth.token_ttl_in_seconds, 60);
        assert_eq!(settings.reset.code_ttl_in_minutes, 5);
        assert_eq!(settings.reset.sweep_interval_in_seconds, 300);
        assert_eq!(settings.email_client.sender, "it@campus.edu");
    }
}
