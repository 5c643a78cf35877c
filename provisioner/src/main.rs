use clap::Parser as _;
use dotenvy::dotenv;
use notification_db_provisioner::cli::{Cli, Commands};
use notification_db_provisioner::setup::provision;
use notification_db_provisioner::utils::logging::init_logging;
use notification_db_provisioner::verify::verify;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logging();
    info!("Starting notification DB provisioner");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Provision { provision_command } => match provision(provision_command).await {
            Ok(report) => {
                if report.is_noop() {
                    info!("Database was already provisioned, nothing to do");
                } else {
                    info!("Database provisioned successfully");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    error = %e,
                    error_chain = ?e,
                    "Failed to provision database"
                );
                ExitCode::FAILURE
            }
        },
        Commands::Verify { verify_command } => match verify(verify_command).await {
            Ok(report) => {
                info!("Verification passed ({} checks)", report.checks);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    error = %e,
                    error_chain = ?e,
                    "Verification failed"
                );
                ExitCode::FAILURE
            }
        },
    }
}
