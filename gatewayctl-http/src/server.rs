//! API server with builder pattern.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatewayctl_http::ApiServer;
//!
//! let server = ApiServer::builder()
//!     .bind("0.0.0.0:8081".parse()?)
//!     .service(service)
//!     .build()?;
//!
//! server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

use crate::handlers;
use axum::routing::{get, post};
use axum::Router;
use gatewayctl_common::{GatewayCtlError, Result, DEFAULT_HTTP_BIND};
use gatewayctl_core::RegistrationService;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared by all handlers.
#[derive(Clone)]
pub struct ApiState {
    pub service: RegistrationService,
}

impl ApiState {
    pub fn new(service: RegistrationService) -> Self {
        Self { service }
    }
}

/// Creates the API router with all endpoints.
///
/// - `POST /plugins/register`
/// - `POST /plugins/unregister`
/// - `GET /plugins/list`
/// - `GET /plugins/{id}`
/// - `GET /healthz`
/// - `GET /metrics`
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/plugins/register", post(handlers::register_plugin))
        .route("/plugins/unregister", post(handlers::unregister_plugin))
        .route("/plugins/list", get(handlers::list_plugins))
        .route("/plugins/{id}", get(handlers::get_plugin))
        .route("/healthz", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server exposing the registration API.
///
/// Use [`ApiServer::builder()`] to construct one.
pub struct ApiServer {
    bind_addr: SocketAddr,
    state: ApiState,
}

/// Builder for [`ApiServer`].
#[derive(Default)]
pub struct ApiServerBuilder {
    bind_addr: Option<SocketAddr>,
    service: Option<RegistrationService>,
}

impl ApiServer {
    pub fn builder() -> ApiServerBuilder {
        ApiServerBuilder::default()
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.bind_addr).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        info!("API server listening on {}", local);

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

impl ApiServerBuilder {
    /// Address to listen on.
    ///
    /// Default: `0.0.0.0:8081`
    #[must_use]
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Registration workflow served by the API.
    #[must_use]
    pub fn service(mut self, service: RegistrationService) -> Self {
        self.service = Some(service);
        self
    }

    /// # Errors
    ///
    /// Returns an error if no service was set.
    pub fn build(self) -> Result<ApiServer> {
        let service = self
            .service
            .ok_or_else(|| GatewayCtlError::InvalidState("registration service not set".into()))?;
        let bind_addr = match self.bind_addr {
            Some(addr) => addr,
            None => DEFAULT_HTTP_BIND
                .parse()
                .map_err(|e| GatewayCtlError::Config(format!("invalid bind address: {e}")))?,
        };
        Ok(ApiServer {
            bind_addr,
            state: ApiState::new(service),
        })
    }
}
