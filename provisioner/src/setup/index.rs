use super::step::StepOutcome;
use super::ExistingPolicy;
use crate::core::client::database::{AdminClient, DatabaseError};
use crate::types::index::IndexSpec;
use crate::ProvisionerResult;
use tracing::{info, warn};

/// Creates `index` on `collection`.
///
/// An existing index with the same key pattern is either the same index (equivalent
/// options) or a conflict. A conflict fails regardless of the policy.
pub(crate) async fn ensure_index<C>(
    client: &C,
    collection: &str,
    index: &IndexSpec,
    policy: ExistingPolicy,
) -> ProvisionerResult<StepOutcome>
where
    C: AdminClient + ?Sized,
{
    let existing = client.list_indexes(collection).await?;
    if let Some(found) = existing.iter().find(|candidate| candidate.same_keys(index)) {
        if !found.is_equivalent(index) {
            return Err(DatabaseError::IndexConflict {
                collection: collection.to_string(),
                keys: index.key_signature(),
                details: format!(
                    "existing index {} has {}, requested {}",
                    found.name.as_deref().unwrap_or("<unnamed>"),
                    found.describe_options(),
                    index.describe_options()
                ),
            }
            .into());
        }
        return match policy {
            ExistingPolicy::Skip => {
                warn!(
                    "Index {} on {} already exists as {}, skipping creation",
                    index.key_signature(),
                    collection,
                    found.name.as_deref().unwrap_or("<unnamed>")
                );
                Ok(StepOutcome::AlreadyPresent)
            }
            ExistingPolicy::Fail => Err(DatabaseError::IndexAlreadyExists {
                collection: collection.to_string(),
                keys: index.key_signature(),
            }
            .into()),
        };
    }

    info!("Creating index {} on {} ({})", index.key_signature(), collection, index.describe_options());
    let name = client.create_index(collection, index).await?;
    info!("Created index {} on {}", name, collection);
    Ok(StepOutcome::Created)
}
