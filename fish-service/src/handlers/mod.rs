pub mod fish;
pub mod health;
pub mod hello;

pub use fish::{get_fish, list_fish};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use hello::hello;
