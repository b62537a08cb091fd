use tubely_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    tubely_api::telemetry::init_telemetry(config.base.log_format)?;
    tracing::info!(environment = %config.base.environment, "Configuration loaded");

    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
