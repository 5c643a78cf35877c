use crate::core::client::database::constant::{
    ADMIN_DATABASE, NOTIFICATIONS_COLLECTION, NOTIFICATION_PREFERENCES_COLLECTION, NOTIFICATION_SERVICE_DATABASE,
    NOTIFICATION_TTL_SECS,
};
use crate::types::index::{IndexKey, IndexSpec};
use crate::types::user::{RoleGrant, UserSpec};
use crate::{ProvisionerError, ProvisionerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_APP_USERNAME: &str = "appUser";
pub const DEFAULT_APP_PASSWORD: &str = "appPassword123";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
}

/// An index together with the collection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPlan {
    pub collection: String,
    #[serde(flatten)]
    pub index: IndexSpec,
}

/// Everything the provisioner creates, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionPlan {
    /// Database the collections and indexes are created in.
    pub database: String,
    pub collections: Vec<CollectionSpec>,
    #[serde(default)]
    pub indexes: Vec<IndexPlan>,
    pub user: UserSpec,
}

impl ProvisionPlan {
    /// Schema and credential of the notification service.
    pub fn notification_service() -> Self {
        Self::notification_service_with(NOTIFICATION_SERVICE_DATABASE, DEFAULT_APP_USERNAME, DEFAULT_APP_PASSWORD)
    }

    pub fn notification_service_with(database: &str, username: &str, password: &str) -> Self {
        Self {
            database: database.to_string(),
            collections: vec![
                CollectionSpec { name: NOTIFICATIONS_COLLECTION.to_string() },
                CollectionSpec { name: NOTIFICATION_PREFERENCES_COLLECTION.to_string() },
            ],
            indexes: vec![
                IndexPlan {
                    collection: NOTIFICATIONS_COLLECTION.to_string(),
                    index: IndexSpec::new(vec![
                        IndexKey::ascending("userId"),
                        IndexKey::ascending("status"),
                        IndexKey::descending("createdAt"),
                    ]),
                },
                IndexPlan {
                    collection: NOTIFICATIONS_COLLECTION.to_string(),
                    index: IndexSpec::new(vec![IndexKey::ascending("createdAt")]).with_ttl(NOTIFICATION_TTL_SECS),
                },
            ],
            user: UserSpec {
                username: username.to_string(),
                password: password.to_string(),
                database: database.to_string(),
                roles: vec![RoleGrant::read_write(database)],
            },
        }
    }

    /// Indexes planned for `collection`, in plan order.
    pub fn indexes_for<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a IndexSpec> + 'a {
        self.indexes.iter().filter(move |plan| plan.collection == collection).map(|plan| &plan.index)
    }

    pub fn validate(&self) -> ProvisionerResult<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProvisionerError::PlanError(problems))
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.database.trim().is_empty() {
            problems.push("database name must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                problems.push("collection names must not be empty".to_string());
            } else if !seen.insert(collection.name.as_str()) {
                problems.push(format!("collection {} is declared more than once", collection.name));
            }
        }

        for plan in &self.indexes {
            let signature = plan.index.key_signature();
            if !seen.contains(plan.collection.as_str()) {
                problems.push(format!("index {} targets undeclared collection {}", signature, plan.collection));
            }
            if plan.index.keys.is_empty() {
                problems.push(format!("index on {} has no keys", plan.collection));
            }
            let mut fields = HashSet::new();
            for key in &plan.index.keys {
                if !fields.insert(key.field.as_str()) {
                    problems.push(format!("index {} on {} repeats field {}", signature, plan.collection, key.field));
                }
            }
            if plan.index.expire_after_secs.is_some() && plan.index.keys.len() != 1 {
                problems.push(format!("TTL index {} on {} must have exactly one key", signature, plan.collection));
            }
        }

        let user = &self.user;
        if user.username.trim().is_empty() {
            problems.push("user name must not be empty".to_string());
        }
        if user.password.is_empty() {
            problems.push(format!("user {} has an empty password", user.username));
        }
        if user.database.trim().is_empty() {
            problems.push(format!("user {} has no database", user.username));
        }
        if user.roles.is_empty() {
            problems.push(format!("user {} has no roles", user.username));
        }
        for role in &user.roles {
            if role.db == ADMIN_DATABASE {
                problems.push(format!("user {} must not be granted {} on the admin database", user.username, role.role));
            }
        }

        problems
    }
}
