//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, rate
//!   limit, security headers, metrics)
//! - Serve plain HTTP or TLS with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::NotesConfig;
use crate::http::handlers;
use crate::http::request::{self, MakeRequestUuid};
use crate::lifecycle::shutdown::{wait_for, ShutdownSignal};
use crate::net::listener::bind_address;
use crate::notes::{ChangeNotifier, LogNotifier, NoteStore};
use crate::observability::metrics;
use crate::security::headers::security_header_layers;
use crate::security::limits::body_limit_layer;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<NoteStore>,
    pub notifier: Arc<dyn ChangeNotifier>,
    pub admin_key: Arc<str>,
    pub max_markdown_chars: usize,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &NotesConfig, store: Arc<NoteStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self {
            store,
            notifier,
            admin_key: Arc::from(config.admin.admin_key.as_str()),
            max_markdown_chars: config.storage.max_markdown_chars,
            trust_forwarded_for: config.security.trust_forwarded_for,
        }
    }
}

/// HTTP server for the notes application.
pub struct NotesServer {
    router: Router,
    config: NotesConfig,
}

impl NotesServer {
    /// Create a server that logs note changes.
    pub fn new(config: NotesConfig, store: Arc<NoteStore>) -> Self {
        Self::with_notifier(config, store, Arc::new(LogNotifier))
    }

    pub fn with_notifier(
        config: NotesConfig,
        store: Arc<NoteStore>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        let state = AppState::new(&config, store, notifier);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &NotesConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route(
                "/notes/{slug}",
                get(handlers::view_note).post(handlers::update_note),
            )
            .with_state(state);

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::new(
                &config.rate_limit,
                config.security.trust_forwarded_for,
            ));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        if config.security.enable_headers {
            for layer in security_header_layers() {
                router = router.layer(layer);
            }
        }

        router
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(body_limit_layer(&config.security, config.storage.max_markdown_chars))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The fully layered router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on the configured bind address until `shutdown` fires.
    pub async fn run_tls(
        self,
        tls: RustlsConfig,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = bind_address(&self.config.listener)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            wait_for(shutdown).await;
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
