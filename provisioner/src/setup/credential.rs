use super::step::StepOutcome;
use super::ExistingPolicy;
use crate::core::client::database::{AdminClient, DatabaseError};
use crate::types::params::RootCredential;
use crate::types::user::{describe_roles, UserSpec};
use crate::ProvisionerResult;
use tracing::{info, warn};

pub(crate) async fn elevate<C>(client: &mut C, root: &RootCredential) -> ProvisionerResult<StepOutcome>
where
    C: AdminClient + ?Sized,
{
    info!("Authenticating as {} against {}", root.username, root.source);
    client.elevate(root).await?;
    Ok(StepOutcome::Authenticated)
}

/// Creates the application user. An existing user is accepted only when its roles
/// match the plan exactly; the password of an existing user cannot be checked here.
pub(crate) async fn ensure_user<C>(client: &C, user: &UserSpec, policy: ExistingPolicy) -> ProvisionerResult<StepOutcome>
where
    C: AdminClient + ?Sized,
{
    if let Some(existing) = client.find_user(&user.database, &user.username).await? {
        if !existing.has_exactly_roles(&user.roles) {
            return Err(DatabaseError::UserConflict {
                username: user.username.clone(),
                database: user.database.clone(),
                details: format!("has {}, requested {}", existing.describe_roles(), describe_roles(&user.roles)),
            }
            .into());
        }
        return match policy {
            ExistingPolicy::Skip => {
                warn!("User {}@{} already exists, skipping creation", user.username, user.database);
                Ok(StepOutcome::AlreadyPresent)
            }
            ExistingPolicy::Fail => Err(DatabaseError::UserAlreadyExists {
                username: user.username.clone(),
                database: user.database.clone(),
            }
            .into()),
        };
    }

    info!("Creating user {}@{} with roles {}", user.username, user.database, describe_roles(&user.roles));
    client.create_user(user).await?;
    Ok(StepOutcome::Created)
}
