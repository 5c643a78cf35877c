use clap::Args;

/// Parameters used to connect to MongoDB and elevate the session.
#[derive(Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server. Collections and indexes are created
    /// as the user in this url, or as the root principal when the url has no credentials.
    #[arg(env = "PROVISIONER_MONGODB_CONNECTION_URL", long, default_value = "mongodb://localhost:27017")]
    pub mongodb_connection_url: String,

    /// The database the collections and indexes are created in.
    #[arg(env = "PROVISIONER_MONGODB_DATABASE_NAME", long, default_value = "sm_notification_service_db")]
    pub mongodb_database_name: String,

    /// Root principal used to create the application user.
    #[arg(env = "PROVISIONER_MONGODB_ROOT_USERNAME", long, default_value = "root")]
    pub mongodb_root_username: String,

    /// Password of the root principal.
    #[arg(env = "PROVISIONER_MONGODB_ROOT_PASSWORD", long, default_value = "password", hide_default_value = true)]
    pub mongodb_root_password: String,

    /// Database the root principal authenticates against.
    #[arg(env = "PROVISIONER_MONGODB_AUTH_SOURCE", long, default_value = "admin")]
    pub mongodb_auth_source: String,
}
