use std::net::SocketAddr;

use api_server::http::{AppState, build_router};
use shared::config::{ApiConfig, load_dotenv};
use shared::llm::ResponseOrchestrator;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,shared=info,axum=info".to_string()),
        )
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!("invalid API_BIND_ADDR {}: {err}", config.bind_addr);
            std::process::exit(1);
        }
    };

    let orchestrator = ResponseOrchestrator::from_config(&config.assistant);
    info!(
        default_model = %config.assistant.defaults.model,
        api_key_env = %config.assistant.api_key_env,
        "assistant orchestrator configured"
    );

    let app = build_router(AppState { orchestrator });

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "api server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("api server stopped with error: {err}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
