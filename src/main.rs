//! HTTP server for the locum calculation engine.
//!
//! Environment:
//! - `LOCUM_CALC_CONFIG`: directory holding `tax_year.yaml`, `federal.yaml`
//!   and `states.yaml`; the embedded tables are used when unset
//! - `LOCUM_CALC_ADDR`: listen address, `0.0.0.0:3000` by default

use std::env;
use std::error::Error;

use locum_calc::api::{AppState, create_router};
use locum_calc::config::ConfigLoader;
use tracing::info;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config = match env::var("LOCUM_CALC_CONFIG") {
        Ok(dir) => {
            info!(config_dir = %dir, "Loading tax tables from disk");
            ConfigLoader::load(&dir)?
        }
        Err(_) => ConfigLoader::builtin()?,
    };
    info!(
        tax_year = config.metadata().tax_year,
        tables = %config.metadata().name,
        "Tax tables loaded"
    );

    let addr = env::var("LOCUM_CALC_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Server starting...");

    axum::serve(listener, create_router(AppState::new(config))).await?;
    Ok(())
}
