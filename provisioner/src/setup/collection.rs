use super::step::StepOutcome;
use super::ExistingPolicy;
use crate::core::client::database::{AdminClient, DatabaseError};
use crate::ProvisionerResult;
use tracing::{info, warn};

/// Creates `name` unless it is already there.
pub(crate) async fn ensure_collection<C>(client: &C, name: &str, policy: ExistingPolicy) -> ProvisionerResult<StepOutcome>
where
    C: AdminClient + ?Sized,
{
    let existing = client.list_collection_names().await?;
    if existing.iter().any(|collection| collection == name) {
        return match policy {
            ExistingPolicy::Skip => {
                warn!("Collection {} already exists, skipping creation", name);
                Ok(StepOutcome::AlreadyPresent)
            }
            ExistingPolicy::Fail => Err(DatabaseError::CollectionAlreadyExists(name.to_string()).into()),
        };
    }

    info!("Creating collection {}", name);
    client.create_collection(name).await?;
    Ok(StepOutcome::Created)
}
