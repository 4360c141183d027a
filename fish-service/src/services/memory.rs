use crate::models::Fish;
use crate::services::repository::{record_query, FishRepository};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-process fish store for running the HTTP surface without MongoDB.
///
/// Can be switched into a failing mode to exercise the 500 paths, and counts
/// every query it serves.
#[derive(Clone, Default)]
pub struct InMemoryFishRepository {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    docs: RwLock<Vec<Document>>,
    failure: RwLock<Option<String>>,
    queries: AtomicUsize,
    shut_down: AtomicBool,
}

impl InMemoryFishRepository {
    pub fn new(docs: Vec<Document>) -> Self {
        let repo = Self::default();
        if let Ok(mut guard) = repo.inner.docs.write() {
            *guard = docs;
        }
        repo
    }

    pub fn insert(&self, doc: Document) {
        if let Ok(mut guard) = self.inner.docs.write() {
            guard.push(doc);
        }
    }

    /// Every subsequent call fails with a database error carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.inner.failure.write() {
            *guard = Some(message.into());
        }
    }

    pub fn recover(&self) {
        if let Ok(mut guard) = self.inner.failure.write() {
            *guard = None;
        }
    }

    /// Number of `list` and `find_by_id` calls served so far.
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), AppError> {
        let failure = self.inner.failure.read().map_err(|_| poisoned())?;
        match failure.as_ref() {
            Some(message) => Err(AppError::DatabaseError(anyhow::anyhow!(message.clone()))),
            None => Ok(()),
        }
    }
}

fn poisoned() -> AppError {
    AppError::InternalError(anyhow::anyhow!("in-memory fish store lock poisoned"))
}

#[async_trait]
impl FishRepository for InMemoryFishRepository {
    async fn list(&self) -> Result<Vec<Fish>, AppError> {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);
        let result = self.check_failure().and_then(|_| {
            let docs = self.inner.docs.read().map_err(|_| poisoned())?;
            Ok(docs.iter().cloned().map(Fish::from).collect())
        });
        record_query("list", &result);
        result
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Fish>, AppError> {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);
        let result = self.check_failure().and_then(|_| {
            let docs = self.inner.docs.read().map_err(|_| poisoned())?;
            Ok(docs
                .iter()
                .find(|doc| doc.get_object_id("_id").ok() == Some(id))
                .cloned()
                .map(Fish::from))
        });
        record_query("find_by_id", &result);
        result
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check_failure()
    }

    async fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::SeqCst);
    }
}
