use log::{info, LevelFilter};
use versa_mock::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, RUST_LOG overrides
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    info!(
        "Configuration loaded: server={}, fixtures={} (cache: {})",
        config.server_address(),
        config.fixtures.dir,
        config.fixtures.cache
    );

    versa_mock::run_server(&config).await
}
