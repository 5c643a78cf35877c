use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Collection already exists: {0}")]
    CollectionAlreadyExists(String),

    #[error("Index on {collection} with keys {keys} already exists")]
    IndexAlreadyExists { collection: String, keys: String },

    #[error("Index on {collection} with keys {keys} conflicts with an existing index: {details}")]
    IndexConflict { collection: String, keys: String, details: String },

    #[error("User {username}@{database} already exists")]
    UserAlreadyExists { username: String, database: String },

    #[error("User {username}@{database} exists with different roles: {details}")]
    UserConflict { username: String, database: String, details: String },

    #[error("Authentication failed for {username}@{source_db}: {message}")]
    AuthenticationFailed { username: String, source_db: String, message: String },

    #[error("Administrative operation `{0}` requires an elevated session")]
    NotElevated(&'static str),

    #[error("Failed to deserialize document: {0}")]
    BsonError(#[from] bson::de::Error),

    #[error("Mongo Error: {0}")]
    MongoError(#[from] mongodb::error::Error),
}
