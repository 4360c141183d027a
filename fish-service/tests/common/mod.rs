#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fish_service::config::{FishConfig, MongoConfig};
use fish_service::services::{init_metrics, FishRepository, InMemoryFishRepository};
use fish_service::startup::{build_router, AppState, Application};
use http_body_util::BodyExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use service_core::config::Config as CoreConfig;
use std::sync::{Arc, Once};
use tokio::sync::oneshot;
use tower::ServiceExt;

pub const SALMON_ID: &str = "507f1f77bcf86cd799439011";
pub const ABSENT_ID: &str = "507f1f77bcf86cd799439099";

static INIT_METRICS: Once = Once::new();

pub fn ensure_metrics_initialized() {
    INIT_METRICS.call_once(|| {
        init_metrics().ok();
    });
}

pub fn salmon() -> Document {
    doc! {
        "_id": ObjectId::parse_str(SALMON_ID).unwrap(),
        "name": "salmon",
    }
}

pub fn test_config() -> FishConfig {
    FishConfig {
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        },
    }
}

pub fn router(repo: &InMemoryFishRepository) -> Router {
    build_router(AppState {
        repo: Arc::new(repo.clone()),
    })
}

/// Sends a GET through the router and returns status plus raw body bytes.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, bytes.to_vec())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = get(app, uri).await;
    let body = serde_json::from_slice(&bytes).expect("Failed to parse JSON");
    (status, body)
}

/// A running server on a random port.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestApp {
    pub async fn spawn(repo: Arc<dyn FishRepository>) -> Self {
        let app = Application::with_repository(test_config(), repo)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    pub async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            app.run_until(async {
                rx.await.ok();
            })
            .await
        });

        // Wait for HTTP server to be ready by polling hello endpoint
        let client = reqwest::Client::new();
        let hello_url = format!("{}/hello", address);
        for _ in 0..50 {
            if client.get(&hello_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            shutdown: Some(tx),
            handle,
        }
    }

    /// Triggers graceful shutdown and waits for the server task to finish.
    pub async fn stop(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.handle.await.expect("Server task panicked")
    }
}
