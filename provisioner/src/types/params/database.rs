use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::utils::redact::redact_connection_url;
use crate::ProvisionerError;
use std::fmt;

const MONGODB_SCHEMES: &[&str] = &["mongodb://", "mongodb+srv://"];

/// Validated MongoDB connection parameters
#[derive(Clone)]
pub struct MongoConfig {
    pub connection_url: String,
    pub database_name: String,
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("connection_url", &redact_connection_url(&self.connection_url))
            .field("database_name", &self.database_name)
            .finish()
    }
}

impl TryFrom<&MongoDBCliArgs> for MongoConfig {
    type Error = ProvisionerError;

    fn try_from(args: &MongoDBCliArgs) -> Result<Self, Self::Error> {
        let connection_url = args.mongodb_connection_url.trim().to_string();
        if !MONGODB_SCHEMES.iter().any(|scheme| connection_url.starts_with(scheme)) {
            return Err(ProvisionerError::ConfigError(format!(
                "MongoDB connection url must start with one of {:?}, got {}",
                MONGODB_SCHEMES,
                redact_connection_url(&connection_url)
            )));
        }
        let database_name = args.mongodb_database_name.trim().to_string();
        if database_name.is_empty() {
            return Err(ProvisionerError::ConfigError("MongoDB database name must not be empty".to_string()));
        }
        Ok(Self { connection_url, database_name })
    }
}

/// Root principal used to elevate the session before creating users.
#[derive(Clone, PartialEq, Eq)]
pub struct RootCredential {
    pub username: String,
    pub password: String,
    pub source: String,
}

impl fmt::Debug for RootCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCredential")
            .field("username", &self.username)
            .field("password", &"***")
            .field("source", &self.source)
            .finish()
    }
}

impl TryFrom<&MongoDBCliArgs> for RootCredential {
    type Error = ProvisionerError;

    fn try_from(args: &MongoDBCliArgs) -> Result<Self, Self::Error> {
        if args.mongodb_root_username.is_empty() || args.mongodb_root_password.is_empty() {
            return Err(ProvisionerError::ConfigError("Root username and password must both be set".to_string()));
        }
        if args.mongodb_auth_source.is_empty() {
            return Err(ProvisionerError::ConfigError("Root auth source must not be empty".to_string()));
        }
        Ok(Self {
            username: args.mongodb_root_username.clone(),
            password: args.mongodb_root_password.clone(),
            source: args.mongodb_auth_source.clone(),
        })
    }
}
