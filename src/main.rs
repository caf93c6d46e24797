use anyhow::{Context, Result};
use langneg::{config::Config, negotiation::LanguageNegotiator, server};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langneg=info".parse()?),
        )
        .init();

    info!("Starting language negotiation service");

    // Load configuration from environment
    let config = Config::from_env()?;
    let negotiator = LanguageNegotiator::new(&config.negotiation)
        .context("Invalid language negotiation config")?;

    info!(
        "Offering {} language(s): {:?}",
        negotiator.offered().len(),
        config.negotiation.match_languages
    );
    if let Some(name) = negotiator.variable_name() {
        info!("Publishing negotiated language as {}", name);
    }

    let app = server::router(Arc::new(negotiator));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
