use crate::models::Fish;
use async_trait::async_trait;
use metrics::counter;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Read access to the fish collection.
#[async_trait]
pub trait FishRepository: Send + Sync {
    /// Every document in the collection, in store order.
    async fn list(&self) -> Result<Vec<Fish>, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Fish>, AppError>;

    /// Liveness check against the backing store.
    async fn health_check(&self) -> Result<(), AppError>;

    /// Releases the underlying connection. Called once after the server stops.
    async fn shutdown(&self) {}
}

/// Counts a store query in `fish_queries_total{operation, outcome}`.
pub(crate) fn record_query<T>(operation: &'static str, result: &Result<T, AppError>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    counter!("fish_queries_total", "operation" => operation, "outcome" => outcome).increment(1);
}
