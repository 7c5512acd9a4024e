//! Backend entry-point: loads settings, wires the movie API, and serves it.

use greenlight::server::{ServerSettings, create_server};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    create_server(&settings).await?.await
}
