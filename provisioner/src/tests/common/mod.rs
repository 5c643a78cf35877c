use crate::core::client::database::constant::{
    NOTIFICATIONS_COLLECTION, NOTIFICATION_PREFERENCES_COLLECTION, NOTIFICATION_SERVICE_DATABASE,
};
use crate::core::client::database::MockAdminClient;
use crate::types::index::{IndexKey, IndexSpec};
use crate::types::params::RootCredential;
use crate::types::plan::ProvisionPlan;
use crate::types::user::{RoleGrant, UserInfo};

pub fn root_credential() -> RootCredential {
    RootCredential { username: "root".to_string(), password: "password".to_string(), source: "admin".to_string() }
}

pub fn plan() -> ProvisionPlan {
    ProvisionPlan::notification_service()
}

pub fn both_collections() -> Vec<String> {
    vec![NOTIFICATIONS_COLLECTION.to_string(), NOTIFICATION_PREFERENCES_COLLECTION.to_string()]
}

pub fn id_index() -> IndexSpec {
    IndexSpec { name: Some("_id_".to_string()), ..IndexSpec::new(vec![IndexKey::ascending("_id")]) }
}

/// `notifications` indexes as `listIndexes` reports them after a successful run.
pub fn provisioned_notification_indexes() -> Vec<IndexSpec> {
    let mut indexes = vec![id_index()];
    for (name, spec) in ["userId_1_status_1_createdAt_-1", "createdAt_1"].into_iter().zip(plan().indexes) {
        indexes.push(IndexSpec { name: Some(name.to_string()), ..spec.index });
    }
    indexes
}

pub fn app_user_info(roles: Vec<RoleGrant>) -> UserInfo {
    UserInfo { username: "appUser".to_string(), database: NOTIFICATION_SERVICE_DATABASE.to_string(), roles }
}

pub fn provisioned_app_user() -> UserInfo {
    app_user_info(vec![RoleGrant::read_write(NOTIFICATION_SERVICE_DATABASE)])
}

/// A client whose read operations describe an already provisioned instance.
/// No write expectations are set, so any creation attempt panics.
pub fn provisioned_instance() -> MockAdminClient {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(both_collections()));
    client.expect_list_indexes().returning(|collection| {
        if collection.to_string() == NOTIFICATIONS_COLLECTION {
            Ok(provisioned_notification_indexes())
        } else {
            Ok(vec![id_index()])
        }
    });
    client.expect_elevate().returning(|_| Ok(()));
    client.expect_find_user().returning(|_, _| Ok(Some(provisioned_app_user())));
    client
}
