pub mod database;
pub mod memory;
pub mod metrics;
pub mod repository;

pub use database::{MongoDb, COLLECTION_NAME, DATABASE_NAME};
pub use memory::InMemoryFishRepository;
pub use self::metrics::{get_metrics, init_metrics};
pub use repository::FishRepository;
