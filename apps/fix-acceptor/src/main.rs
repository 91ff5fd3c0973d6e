//! FIX Acceptor Binary
//!
//! Starts the FIX listener and the admin HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin fix-acceptor
//! ```
//!
//! # Environment Variables
//!
//! - `FIX_LISTEN_HOST`: FIX bind host (default: 0.0.0.0)
//! - `FIX_LISTEN_PORT`: FIX bind port (default: 15001)
//! - `ADMIN_PORT`: admin HTTP port (default: 15080)
//! - `SERVER_COMP_ID`: our comp id (default: BROKER)
//! - `DEFAULT_HEARTBEAT_S`: heartbeat before logon negotiates one (default: 30)
//! - `MAX_SESSIONS`: concurrent session cap, 0 = unbounded (default: 0)
//! - `RUST_LOG`: log level (default: info)

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use fix_acceptor::acceptor::Acceptor;
use fix_acceptor::admin::{AppState, create_router};
use fix_acceptor::config::AcceptorConfig;
use fix_acceptor::dispatch::ExecutionDispatcher;
use fix_acceptor::engine::OrderEngine;
use fix_acceptor::session::{SessionContext, SessionRegistry};
use fix_acceptor::store::OrderStore;
use fix_acceptor::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    telemetry::init();

    let config = Arc::new(AcceptorConfig::from_env());
    tracing::info!(
        listen = %config.listen_addr(),
        admin = %config.admin_addr(),
        comp_id = %config.server_comp_id,
        heartbeat_s = config.default_heartbeat.as_secs(),
        max_sessions = config.max_sessions,
        "Configuration loaded"
    );

    // Shared state
    let store = Arc::new(OrderStore::new());
    let registry = Arc::new(SessionRegistry::new());
    let engine = OrderEngine::new(Arc::clone(&store));
    let dispatcher = ExecutionDispatcher::new(Arc::clone(&store), Arc::clone(&registry));

    let cancel = CancellationToken::new();

    // Admin HTTP API
    let admin_state = AppState {
        dispatcher,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let app = create_router(admin_state);
    let admin_listener = TcpListener::bind(config.admin_addr()).await?;

    tracing::info!(addr = %config.admin_addr(), "Admin HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/orders");
    tracing::info!("  GET  /api/v1/orders/{{cl_ord_id}}");
    tracing::info!("  GET  /api/v1/executions");
    tracing::info!("  POST /api/v1/orders/{{cl_ord_id}}/fill");
    tracing::info!("  POST /api/v1/orders/{{cl_ord_id}}/cancel");
    tracing::info!("  POST /api/v1/orders/{{cl_ord_id}}/reject");

    let admin_cancel = cancel.clone();
    let admin_handle = tokio::spawn(async move {
        let server = axum::serve(admin_listener, app)
            .with_graceful_shutdown(async move { admin_cancel.cancelled().await });
        if let Err(e) = server.await {
            tracing::error!("Admin server error: {e}");
        }
    });

    // FIX acceptor
    let ctx = SessionContext {
        config: Arc::clone(&config),
        engine,
        registry,
    };
    let acceptor = Acceptor::bind(ctx, cancel.clone()).await?;
    let acceptor_handle = tokio::spawn(acceptor.run());

    tracing::info!("FIX acceptor ready");

    shutdown_signal().await;
    cancel.cancel();

    let _ = acceptor_handle.await;
    let _ = admin_handle.await;

    tracing::info!("FIX acceptor stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
