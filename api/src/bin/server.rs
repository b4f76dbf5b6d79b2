use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "settings_api=info,settings_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    settings_api::server::serve().await?;

    Ok(())
}
