use anyhow::Context;
use dotenvy::dotenv;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use video_compressor::app;
use video_compressor::config::settings::AppConfig;
use video_compressor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("video_compressor=info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let mut config = AppConfig::new().context("invalid configuration")?;
    config
        .prepare_scratch_dirs()
        .context("failed to prepare scratch directories")?;

    info!(
        "Scratch dirs: uploads={:?} outputs={:?}, transcoder={:?}",
        config.upload_dir, config.output_dir, config.ffmpeg_path
    );
    match config.max_concurrent_transcodes {
        Some(limit) => info!("Transcodes limited to {} at a time", limit),
        None => info!("Transcodes are not limited"),
    }

    let addr = config.listen_addr();
    let app = app::create_app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
