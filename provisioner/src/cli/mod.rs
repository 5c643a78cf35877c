use clap::{Args, Parser, Subcommand};
use credential::AppUserCliArgs;
use database::mongodb::MongoDBCliArgs;
use std::path::PathBuf;

pub mod credential;
pub mod database;

#[derive(Parser)]
#[command(
    name = "provisioner",
    about = "Notification DB Provisioner - creates the notification service schema and credential",
    long_about = "Creates the notification collections, their indexes and the application user.\n\n\
    Meant to run once, when the MongoDB data volume is fresh.",
    after_help = "Examples:\n  \
    provisioner provision\n  \
    provisioner provision --strict --mongodb-connection-url mongodb://mongo:27017\n  \
    provisioner verify --probe-access\n  \
    provisioner provision --plan-file plans/notification-service.yaml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create collections, indexes and the application user
    #[command(long_about = "Create collections, indexes and the application user, in that order.\n\n\
        Objects that already exist with the same definition are skipped unless --strict is set.\n\
        Objects that exist with a different definition always fail the run.")]
    Provision {
        #[command(flatten)]
        provision_command: Box<ProvisionCmd>,
    },
    /// Check that an instance matches the provisioning plan
    Verify {
        #[command(flatten)]
        verify_command: Box<VerifyCmd>,
    },
}

/// Arguments shared by every command.
#[derive(Clone, Args)]
pub struct TargetArgs {
    #[clap(flatten)]
    pub mongodb_args: MongoDBCliArgs,

    #[clap(flatten)]
    pub app_user_args: AppUserCliArgs,

    /// YAML plan to use instead of the built-in notification service plan.
    /// When set, the app user flags and the database name flag are ignored.
    #[arg(env = "PROVISIONER_PLAN_FILE", long)]
    pub plan_file: Option<PathBuf>,
}

#[derive(Clone, Args)]
pub struct ProvisionCmd {
    #[clap(flatten)]
    pub target: TargetArgs,

    /// Fail on the first object that already exists instead of skipping it.
    #[arg(env = "PROVISIONER_STRICT", long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Clone, Args)]
pub struct VerifyCmd {
    #[clap(flatten)]
    pub target: TargetArgs,

    /// Also log in as the application user and probe its read/write access.
    #[arg(long, default_value_t = false)]
    pub probe_access: bool,
}
