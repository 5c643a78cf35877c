//! Provisions the notification service database: its collections, their indexes and
//! the application credential the service connects with.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod setup;
pub mod types;
pub mod utils;
pub mod verify;

#[cfg(test)]
pub mod tests;

// Re-export commonly used item
pub use error::{ProvisionerError, ProvisionerResult};
