use campus_adapters::{
    config::CampusSettings,
    crypto::JwtTokenSigner,
    email::PostmarkEmailClient,
    persistence::{PostgresRecordStore, RedisResetTicketStore},
};
use campus_core::Email;
use campus_identity_service::{
    IdentityService, configure_postgresql, configure_redis, init_tracing, jwt_config,
    reset_policy,
};
use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client as HttpClient;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = CampusSettings::load().wrap_err("Failed to load settings")?;

    let pg_pool = configure_postgresql(&settings)
        .await
        .wrap_err("Failed to set up PostgreSQL")?;
    let redis_conn = configure_redis(&settings).wrap_err("Failed to connect to Redis")?;

    let record_store = PostgresRecordStore::new(pg_pool);
    let ticket_store = RedisResetTicketStore::new(redis_conn);

    let http_client = HttpClient::builder()
        .timeout(settings.email_client.timeout())
        .build()?;
    let email_client = PostmarkEmailClient::new(
        &settings.email_client.base_url,
        Email::parse(&settings.email_client.sender).wrap_err("Invalid sender address")?,
        settings.email_client.auth_token.clone(),
        http_client,
    )
    .wrap_err("Invalid email client base url")?;

    let signer = JwtTokenSigner::new(jwt_config(&settings.auth));

    let service = IdentityService::new(record_store, ticket_store, email_client, signer)
        .with_policy(reset_policy(&settings.reset));

    let sweeper = service.spawn_reset_sweeper();
    tracing::info!(
        sweep_interval_in_seconds = settings.reset.sweep_interval_in_seconds,
        "Campus identity service ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    sweeper.abort();

    Ok(())
}
