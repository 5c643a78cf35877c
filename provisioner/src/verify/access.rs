use super::VerificationReport;
use crate::core::client::database::constant::error_code;
use crate::core::client::database::mongodb::{server_error_code, MongoDbClient};
use crate::core::client::database::DatabaseError;
use crate::types::params::MongoConfig;
use crate::types::plan::ProvisionPlan;
use crate::{ProvisionerError, ProvisionerResult};
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::Credential;
use tracing::{debug, warn};

/// Database the application user must not be able to write to.
pub const FORBIDDEN_PROBE_DATABASE: &str = "provisioner_access_probe";

/// Logs in as the planned application user and checks that it can write the target
/// database and nothing else. Probe documents are removed again.
pub async fn probe_access(config: &MongoConfig, plan: &ProvisionPlan) -> ProvisionerResult<VerificationReport> {
    let mut report = VerificationReport::default();
    let user = &plan.user;
    let Some(collection) = plan.collections.first() else {
        return Err(ProvisionerError::ConfigError("access probe needs at least one planned collection".to_string()));
    };

    let credential = Credential::builder()
        .username(user.username.clone())
        .password(user.password.clone())
        .source(user.database.clone())
        .build();
    let client = MongoDbClient::connect_as(&config.connection_url, credential).await?;

    let allowed = client.database(&plan.database).collection::<Document>(&collection.name);
    let probe = doc! { "_provisionerProbe": true, "createdAt": DateTime::now() };
    match allowed.insert_one(probe).await {
        Ok(inserted) => {
            debug!("Probe document written to {}.{}", plan.database, collection.name);
            let removed = allowed.delete_one(doc! { "_id": inserted.inserted_id }).await.map_err(DatabaseError::from)?;
            if removed.deleted_count == 1 {
                report.pass();
            } else {
                report.fail(format!("probe document in {}.{} could not be removed", plan.database, collection.name));
            }
        }
        Err(err) => report.fail(format!(
            "user {} cannot write to {}.{}: {}",
            user.username, plan.database, collection.name, err
        )),
    }

    let forbidden = client.database(FORBIDDEN_PROBE_DATABASE).collection::<Document>(&collection.name);
    match forbidden.insert_one(doc! { "_provisionerProbe": true }).await {
        Err(err) if server_error_code(&err) == Some(error_code::UNAUTHORIZED) => report.pass(),
        Err(err) => report.fail(format!(
            "write to {} failed for an unexpected reason: {}",
            FORBIDDEN_PROBE_DATABASE, err
        )),
        Ok(_) => {
            warn!("Application user could write to {}, cleaning up", FORBIDDEN_PROBE_DATABASE);
            if let Err(err) = client.database(FORBIDDEN_PROBE_DATABASE).drop().await {
                warn!(error = %err, "Failed to drop {}", FORBIDDEN_PROBE_DATABASE);
            }
            report.fail(format!("user {} can write outside {}", user.username, plan.database));
        }
    }

    Ok(report)
}
