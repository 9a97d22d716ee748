use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use healthsense_core::constants::{CORS_ORIGINS_ENV, DEFAULT_REST_ADDR, REST_ADDR_ENV};
use healthsense_core::{
    AssessmentPipeline, ProviderConfig, ProviderEnv, cors_origins_from_env_value,
};

/// Main entry point for the HealthSense backend
///
/// Resolves configuration once, builds the assessment pipeline and serves the REST API.
/// A missing provider credential is not fatal: the service starts and the analysis
/// endpoint answers 503 until the process is restarted with a key.
///
/// # Environment Variables
/// - `HEALTHSENSE_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `HEALTHSENSE_CORS_ORIGINS`: comma-separated allowed origins
/// - `OPENROUTER_API_KEY` and the `HEALTHSENSE_*` provider overrides, see `ProviderEnv`
///
/// # Returns
/// * `Ok(())` - If the server runs until shutdown
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthsense=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProviderConfig::from_env_values(ProviderEnv::from_process_env())?;
    let cors_origins = cors_origins_from_env_value(std::env::var(CORS_ORIGINS_ENV).ok())?;
    let pipeline = AssessmentPipeline::from_config(config)?;

    let config = pipeline.config();
    if !config.is_configured() {
        tracing::warn!("OPENROUTER_API_KEY is not set; symptom analysis will answer 503");
    }
    tracing::info!(
        "++ Model candidates: {} (timeout {}s)",
        config.models().join(", "),
        config.timeout().as_secs()
    );
    let app = api_rest::router(AppState { pipeline }, &cors_origins)?;

    let rest_addr = std::env::var(REST_ADDR_ENV).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    api_rest::serve(&rest_addr, app).await
}
