//! Application startup and lifecycle management.
//!
//! Startup is fail-fast: configuration, connection and the initial ping must all
//! succeed before the listener is handed to axum. The store connection is
//! released once the server has stopped.

use crate::config::FishConfig;
use crate::handlers;
use crate::services::{FishRepository, MongoDb};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, panic_boundary, request_id_middleware, REQUEST_ID_HEADER,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn FishRepository>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/fish", get(handlers::list_fish))
        .route("/fish/:id", get(handlers::get_fish))
        .route("/hello", get(handlers::hello))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(panic_boundary())
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects to MongoDB, pings it and binds the HTTP listener.
    pub async fn build(config: FishConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            e
        })?;

        if let Err(e) = db.health_check().await {
            tracing::error!("MongoDB did not answer the startup ping: {}", e);
            FishRepository::shutdown(&db).await;
            return Err(e);
        }
        tracing::info!("Pinged deployment, MongoDB connection is live");

        Self::with_repository(config, Arc::new(db)).await
    }

    /// Binds the HTTP listener over an already constructed repository. The
    /// repository is shut down if binding fails.
    pub async fn with_repository(
        config: FishConfig,
        repo: Arc<dyn FishRepository>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
                repo.shutdown().await;
                return Err(AppError::from(e));
            }
        };
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { repo },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn repository(&self) -> Arc<dyn FishRepository> {
        self.state.repo.clone()
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, drain in-flight requests, then release
    /// the store connection whether or not the server exited cleanly.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let repo = self.state.repo.clone();
        let app = build_router(self.state);

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        if let Err(e) = &result {
            tracing::error!("Server error: {}", e);
        }

        repo.shutdown().await;
        tracing::info!("Server stopped");

        result
    }
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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

    tracing::info!("Shutdown signal received");
}
