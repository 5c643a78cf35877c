use super::constant::error_code;
use super::error::DatabaseError;
use super::AdminClient;
use crate::types::index::IndexSpec;
use crate::types::params::{MongoConfig, RootCredential};
use crate::types::user::{UserInfo, UserSpec};
use crate::utils::redact::redact_connection_url;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, Credential};
use mongodb::{bson, Client, Database, IndexModel};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Returns the server error code carried by a driver error, if any.
pub fn server_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match &*err.kind {
        ErrorKind::Command(command_error) => Some(command_error.code),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        _ => None,
    }
}

fn is_authentication_error(err: &mongodb::error::Error) -> bool {
    matches!(&*err.kind, ErrorKind::Authentication { .. })
        || server_error_code(err) == Some(error_code::AUTHENTICATION_FAILED)
}

#[derive(Debug, Deserialize)]
struct ConnectionStatus {
    #[serde(rename = "authInfo")]
    auth_info: AuthInfo,
}

#[derive(Debug, Deserialize)]
struct AuthInfo {
    #[serde(rename = "authenticatedUsers", default)]
    authenticated_users: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct UsersInfo {
    #[serde(default)]
    users: Vec<UserInfo>,
}

/// MongoDB client implementation
pub struct MongoDbClient {
    database: Arc<Database>,
    connection_url: String,
    /// Client authenticated as a root principal, set by `elevate`.
    elevated: Option<Client>,
}

impl MongoDbClient {
    /// Opens the session the schema steps run on.
    ///
    /// Credentials in the connection url are used as given. A url without credentials
    /// opens the session as the root principal.
    pub async fn new(config: &MongoConfig, root: &RootCredential) -> Result<Self, DatabaseError> {
        debug!(url = %redact_connection_url(&config.connection_url), database = %config.database_name, "Connecting to MongoDB");
        let options = session_options(&config.connection_url, root).await?;
        let client = Client::with_options(options)?;
        let database = Arc::new(client.database(&config.database_name));
        Ok(Self { database, connection_url: config.connection_url.clone(), elevated: None })
    }

    fn elevated(&self, operation: &'static str) -> Result<&Client, DatabaseError> {
        self.elevated.as_ref().ok_or(DatabaseError::NotElevated(operation))
    }

    /// Opens a client on the same hosts as the session, authenticated with `credential`.
    pub async fn connect_as(connection_url: &str, credential: Credential) -> Result<Client, DatabaseError> {
        let mut options = ClientOptions::parse(connection_url).await?;
        options.credential = Some(credential);
        Ok(Client::with_options(options)?)
    }
}

fn scram_credential(root: &RootCredential) -> Credential {
    Credential::builder()
        .username(root.username.clone())
        .password(root.password.clone())
        .source(root.source.clone())
        .build()
}

pub(crate) async fn session_options(connection_url: &str, root: &RootCredential) -> Result<ClientOptions, DatabaseError> {
    let mut options = ClientOptions::parse(connection_url).await?;
    if options.credential.is_none() {
        info!("Connection url carries no credentials, opening the session as {}@{}", root.username, root.source);
        options.credential = Some(scram_credential(root));
    }
    Ok(options)
}

/// Number of principals a `connectionStatus` reply says the connection is authenticated as.
fn authenticated_user_count(response: Document) -> Result<usize, DatabaseError> {
    let status: ConnectionStatus = bson::from_document(response)?;
    Ok(status.auth_info.authenticated_users.len())
}

#[async_trait]
impl AdminClient for MongoDbClient {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(self.database.list_collection_names().await?)
    }

    async fn create_collection(&self, name: &str) -> Result<(), DatabaseError> {
        self.database.create_collection(name).await.map_err(|err| match server_error_code(&err) {
            Some(error_code::NAMESPACE_EXISTS) => DatabaseError::CollectionAlreadyExists(name.to_string()),
            _ => err.into(),
        })
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexSpec>, DatabaseError> {
        let cursor = match self.database.collection::<Document>(collection).list_indexes().await {
            Ok(cursor) => cursor,
            Err(err) if server_error_code(&err) == Some(error_code::NAMESPACE_NOT_FOUND) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let models: Vec<IndexModel> = cursor.try_collect().await?;

        let mut indexes = Vec::with_capacity(models.len());
        for model in &models {
            match IndexSpec::from_index_model(model) {
                Some(spec) => indexes.push(spec),
                None => warn!(collection = %collection, keys = %model.keys, "Skipping index with unsupported key pattern"),
            }
        }
        Ok(indexes)
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<String, DatabaseError> {
        let result =
            self.database.collection::<Document>(collection).create_index(index.to_index_model()).await.map_err(
                |err| match server_error_code(&err) {
                    Some(error_code::INDEX_OPTIONS_CONFLICT) | Some(error_code::INDEX_KEY_SPECS_CONFLICT) => {
                        DatabaseError::IndexConflict {
                            collection: collection.to_string(),
                            keys: index.key_signature(),
                            details: err.to_string(),
                        }
                    }
                    _ => err.into(),
                },
            )?;
        Ok(result.index_name)
    }

    async fn elevate(&mut self, credential: &RootCredential) -> Result<(), DatabaseError> {
        let auth_failed = |message: String| DatabaseError::AuthenticationFailed {
            username: credential.username.clone(),
            source_db: credential.source.clone(),
            message,
        };

        let client = Self::connect_as(&self.connection_url, scram_credential(credential)).await?;

        let response = client
            .database(&credential.source)
            .run_command(doc! { "connectionStatus": 1 })
            .await
            .map_err(|err| if is_authentication_error(&err) { auth_failed(err.to_string()) } else { err.into() })?;
        if authenticated_user_count(response)? == 0 {
            return Err(auth_failed("server reports no authenticated users".to_string()));
        }

        self.elevated = Some(client);
        Ok(())
    }

    async fn find_user(&self, database: &str, username: &str) -> Result<Option<UserInfo>, DatabaseError> {
        let client = self.elevated("usersInfo")?;
        let response =
            client.database(database).run_command(doc! { "usersInfo": { "user": username, "db": database } }).await?;
        let info: UsersInfo = bson::from_document(response)?;
        Ok(info.users.into_iter().find(|user| user.username == username && user.database == database))
    }

    async fn create_user(&self, user: &UserSpec) -> Result<(), DatabaseError> {
        let client = self.elevated("createUser")?;
        client.database(&user.database).run_command(user.create_user_command()).await.map_err(|err| {
            match server_error_code(&err) {
                Some(error_code::USER_ALREADY_EXISTS) => DatabaseError::UserAlreadyExists {
                    username: user.username.clone(),
                    database: user.database.clone(),
                },
                _ => err.into(),
            }
        })?;
        Ok(())
    }
}
