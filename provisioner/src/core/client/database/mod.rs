pub mod constant;
pub mod error;
pub mod mongodb;

use crate::types::index::IndexSpec;
use crate::types::params::RootCredential;
use crate::types::user::{UserInfo, UserSpec};
use async_trait::async_trait;
pub use error::DatabaseError;

/// Administrative operations the provisioner needs from the database.
///
/// Schema operations run on the session the client was opened with. User
/// operations require [`AdminClient::elevate`] to have succeeded first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// ping - Check that the server is reachable
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// list_collection_names - Names of the collections in the target database
    async fn list_collection_names(&self) -> Result<Vec<String>, DatabaseError>;

    /// create_collection - Create an empty collection in the target database
    async fn create_collection(&self, name: &str) -> Result<(), DatabaseError>;

    /// list_indexes - Indexes of a collection, empty if the collection does not exist
    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexSpec>, DatabaseError>;

    /// create_index - Create an index and return the name the server gave it
    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, DatabaseError>;

    /// elevate - Re-authenticate as a root principal so users can be managed
    async fn elevate(&mut self, credential: &RootCredential) -> Result<(), DatabaseError>;

    /// find_user - Look a user up in the database it is defined in
    async fn find_user(&self, database: &str, username: &str) -> Result<Option<UserInfo>, DatabaseError>;

    /// create_user - Create a user with its roles
    async fn create_user(&self, user: &UserSpec) -> Result<(), DatabaseError>;
}
