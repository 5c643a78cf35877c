use thiserror::Error;

use crate::core::client::database::DatabaseError;

/// Result type for provisioner operations
pub type ProvisionerResult<T> = Result<T, ProvisionerError>;

/// Error types for the provisioner
#[derive(Error, Debug)]
pub enum ProvisionerError {
    #[error("Database error: {0}")]
    DatabaseCoreError(#[from] DatabaseError),

    /// Invalid CLI or environment configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Plan failed validation, one entry per problem
    #[error("Invalid provisioning plan: {}", .0.join("; "))]
    PlanError(Vec<String>),

    /// Verification found the instance in an unexpected state, one entry per problem
    #[error("Verification failed with {} problem(s): {}", .0.len(), .0.join("; "))]
    VerificationFailed(Vec<String>),

    #[error("Provisioner Error: {0}")]
    ProvisionerAnyHowError(#[from] anyhow::Error),
}
