use clap::Args;

/// Application credential handed to the notification service.
#[derive(Clone, Args)]
pub struct AppUserCliArgs {
    /// Name of the application user.
    #[arg(env = "PROVISIONER_APP_USERNAME", long, default_value = "appUser")]
    pub app_username: String,

    /// Password of the application user.
    #[arg(env = "PROVISIONER_APP_PASSWORD", long, default_value = "appPassword123", hide_default_value = true)]
    pub app_password: String,
}
