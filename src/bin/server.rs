use product_preview::{
    build_router, setup_logging, ExtractionConfig, ExtractionService, LogConfig,
};
use std::time::Duration;

fn config_from_env() -> ExtractionConfig {
    let mut config = ExtractionConfig::default();

    if let Ok(secs) = std::env::var("FETCH_TIMEOUT_SECS") {
        if let Ok(secs) = secs.parse::<u64>() {
            config.timeout = Duration::from_secs(secs);
        }
    }
    if let Ok(flag) = std::env::var("VENDOR_OVERLAYS") {
        config.vendor_overlays_enabled = flag != "0" && !flag.eq_ignore_ascii_case("false");
    }

    config
}

#[tokio::main]
async fn main() {
    setup_logging(LogConfig::default());

    let config = config_from_env();
    tracing::info!(?config, "Starting product metadata extraction service");

    let service = ExtractionService::new_with_config(config);
    let app = build_router(service);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server exited with error");
    }
}
