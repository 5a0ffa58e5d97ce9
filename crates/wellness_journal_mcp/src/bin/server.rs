use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use wellness_engine::{Config, StoreBackend};
use wellness_journal_mcp::{WellnessMcpHandler, logging};
use wellness_journal_mcp::http::{AppState, DEFAULT_MAX_BODY_SIZE, router};

fn store_label(backend: StoreBackend) -> &'static str {
    match backend {
        StoreBackend::File => "file",
        StoreBackend::Memory => "memory",
    }
}

fn max_body_size_from(raw: Option<String>) -> usize {
    raw.and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_BODY_SIZE)
}

#[cfg(test)]
#[allow(clippy::items_after_test_module)]
mod tests {
    use super::*;

    #[test]
    fn body_size_falls_back_on_garbage() {
        assert_eq!(max_body_size_from(None), DEFAULT_MAX_BODY_SIZE);
        assert_eq!(max_body_size_from(Some("abc".into())), DEFAULT_MAX_BODY_SIZE);
        assert_eq!(max_body_size_from(Some("1024".into())), 1024);
    }

    #[test]
    fn backend_labels() {
        assert_eq!(store_label(StoreBackend::File), "file");
        assert_eq!(store_label(StoreBackend::Memory), "memory");
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let log_level = logging::log_level_from_env();
    logging::init(&log_level);
    tracing::info!(%log_level, "wellness_journal_mcp:http: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let config = Config::from_env()?;
    let store = wellness_engine::store::from_config(&config);
    let handler = WellnessMcpHandler::from_config(store, &config);
    let state = Arc::new(AppState {
        service: handler.service().clone(),
        metrics: handle,
        store_label: store_label(config.backend),
    });

    let max_body_size = max_body_size_from(std::env::var("MAX_HTTP_BODY_SIZE").ok());
    let app = router(state, handler, max_body_size);

    let addr: SocketAddr = std::env::var("ADDRESS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!(
        %addr,
        max_body_bytes = max_body_size,
        backend = store_label(config.backend),
        "starting HTTP server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to address {addr}: {e}"))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to install ctrl+c handler: {e}");
            }
        })
        .await?;

    Ok(())
}
