pub mod database;

pub use database::{MongoConfig, RootCredential};
