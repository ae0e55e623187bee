use afiliados_api::{AppConfig, build_state, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env();
    if !config.missing_store_vars.is_empty() {
        tracing::warn!(
            missing = ?config.missing_store_vars,
            "store not configured, starting degraded"
        );
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let app = router(build_state(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
