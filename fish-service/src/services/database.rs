use crate::models::Fish;
use crate::services::repository::{record_query, FishRepository};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

pub const DATABASE_NAME: &str = "resep";
pub const COLLECTION_NAME: &str = "ikan";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str) -> Result<Self, AppError> {
        Self::connect_to(uri, DATABASE_NAME).await
    }

    /// Same as [`MongoDb::connect`] against an explicit database. Tests use it to
    /// isolate themselves in throwaway databases.
    pub async fn connect_to(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some("fish-service".to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client created");
        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn fish(&self) -> Collection<Document> {
        self.db.collection(COLLECTION_NAME)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn fetch_all(&self) -> Result<Vec<Fish>, AppError> {
        let mut cursor = self.fish().find(None, None).await?;

        let mut fish = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            fish.push(Fish::from(doc));
        }
        Ok(fish)
    }
}

#[async_trait]
impl FishRepository for MongoDb {
    async fn list(&self) -> Result<Vec<Fish>, AppError> {
        let result = self.fetch_all().await;
        record_query("list", &result);
        result
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Fish>, AppError> {
        let result = self
            .fish()
            .find_one(doc! { "_id": id }, None)
            .await
            .map(|found| found.map(Fish::from))
            .map_err(AppError::from);
        record_query("find_by_id", &result);
        result
    }

    async fn health_check(&self) -> Result<(), AppError> {
        MongoDb::health_check(self).await
    }

    async fn shutdown(&self) {
        tracing::info!("Closing MongoDB connection");
        self.client.clone().shutdown().await;
    }
}
