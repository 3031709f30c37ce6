//! `twui serve` command.

use tokio::net::TcpListener;

use super::{build_context, resolve_serve_config, runtime};
use crate::cli::ServeArgs;
use crate::config::ServerConfig;
use crate::context::ServiceContext;
use crate::server::{self, AppState};

/// Execute the `serve` command.
///
/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error string if configuration, binding or serving fails.
pub fn run(args: &ServeArgs) -> Result<(), String> {
    let config = resolve_serve_config(args).map_err(|e| e.to_string())?;
    let ctx = build_context(args.store.store, &config);
    runtime()?.block_on(serve(ctx, config))
}

async fn serve(ctx: ServiceContext, config: ServerConfig) -> Result<(), String> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    let state = AppState::new(ctx, config);
    tracing::info!("running at http://{addr}");
    server::serve(listener, state, shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
