use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hep_times::config::Config;
use hep_times::routes::{self, AppState};

const DEFAULT_CONFIG_PATH: &str = "hep_times.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hep_times=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("HEP_TIMES_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        info!("{} not found, using built-in defaults", config_path);
        Config::default()
    };
    info!(
        "Front page: {:?}, {} rubric pages",
        config.front_page.categories,
        config.rubrics.len()
    );

    let bind = config.bind.clone();
    let state = Arc::new(AppState::new(config)?);
    info!("Listings come from {}", state.fetcher.api_url());

    let app = routes::app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server starting on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
