//! HTTP front-end.
//!
//! Every request goes through a single fallback handler ([`routes::dispatch`])
//! that classifies the path by prefix, so the routing table stays in one
//! place and keeps first-match order.
//!
//! ## Submodules
//! - **`routes`**: path classification and dispatch.
//! - **`mutation`**: body buffering, payload parsing and modifier calls for
//!   the PUT routes.
//! - **`response`**: status mapping and response builders.
//! - **`assets`**: the static file fallback.

pub mod assets;
pub mod mutation;
pub mod response;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::cache::TaskCache;
use crate::config::ServerConfig;
use crate::context::ServiceContext;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    ctx: ServiceContext,
    cache: TaskCache,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates state with an unset cache.
    #[must_use]
    pub fn new(ctx: ServiceContext, config: ServerConfig) -> Self {
        Self {
            ctx,
            cache: TaskCache::new(),
            config: Arc::new(config),
        }
    }

    /// The external boundaries.
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// The cached task collection.
    #[must_use]
    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Refreshes the cache without waiting for the result.
    pub fn refresh_in_background(&self) -> JoinHandle<()> {
        self.cache.spawn_refresh(
            self.ctx.fetcher.clone(),
            self.config.collaborator_timeout(),
        )
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(routes::dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `state` on `listener` until `shutdown` resolves.
///
/// A cache refresh is scheduled before the first connection is accepted,
/// so `/tasks` fills without anyone asking for `/refresh`.
///
/// # Errors
///
/// Returns an error if accepting connections fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("scheduling startup refresh");
    state.refresh_in_background();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
