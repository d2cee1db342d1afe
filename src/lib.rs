pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use config::AppConfig;

/// Start the HTTP service and serve until Ctrl-C.
///
/// Blocking Ollama clients are built before the tokio runtime starts.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    tracing::info!(
        addr = %config.socket_addr(),
        ollama = %config.ollama_url,
        model = %config.llm_model,
        vision_model = %config.vision_model,
        "Configuration loaded"
    );

    let simplifier = pipeline::processor::build_simplifier(&config)?;
    let ctx = api::ApiContext::new(Arc::new(simplifier), config.max_upload_bytes);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let server = api::start_server_on(ctx, config.socket_addr()).await?;
        tracing::info!(addr = %server.session.server_addr, "Listening");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
        }
        server.stop().await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
