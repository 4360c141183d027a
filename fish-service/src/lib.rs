//! fish-service: read-only HTTP API over the `resep.ikan` fish recipe collection.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
