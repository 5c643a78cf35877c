use crate::core::client::database::constant::{
    NOTIFICATIONS_COLLECTION, NOTIFICATION_PREFERENCES_COLLECTION, NOTIFICATION_SERVICE_DATABASE,
    NOTIFICATION_TTL_SECS,
};
use crate::core::client::database::{DatabaseError, MockAdminClient};
use crate::setup::step::{ProvisionStep, StepOutcome};
use crate::setup::{ExistingPolicy, Provisioner};
use crate::tests::common::{
    app_user_info, both_collections, id_index, plan, provisioned_app_user, provisioned_instance,
    provisioned_notification_indexes, root_credential,
};
use crate::types::index::IndexSpec;
use crate::types::user::RoleGrant;
use crate::ProvisionerError;
use assert_matches::assert_matches;
use mockall::Sequence;
use rstest::rstest;

/// Expectations for a fresh instance, chained so any reordering fails the test.
fn fresh_instance() -> MockAdminClient {
    let mut client = MockAdminClient::new();
    let mut seq = Sequence::new();

    client.expect_list_collection_names().times(1).in_sequence(&mut seq).returning(|| Ok(vec![]));
    client
        .expect_create_collection()
        .withf(|name| name.to_string() == NOTIFICATIONS_COLLECTION)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    client
        .expect_list_collection_names()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![NOTIFICATIONS_COLLECTION.to_string()]));
    client
        .expect_create_collection()
        .withf(|name| name.to_string() == NOTIFICATION_PREFERENCES_COLLECTION)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    client.expect_list_indexes().times(1).in_sequence(&mut seq).returning(|_| Ok(vec![id_index()]));
    client
        .expect_create_index()
        .withf(|collection, index| {
            collection.to_string() == NOTIFICATIONS_COLLECTION && index.keys.len() == 3 && index.expire_after_secs.is_none()
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok("userId_1_status_1_createdAt_-1".to_string()));
    client.expect_list_indexes().times(1).in_sequence(&mut seq).returning(|_| {
        Ok(provisioned_notification_indexes().into_iter().take(2).collect())
    });
    client
        .expect_create_index()
        .withf(|collection, index| {
            collection.to_string() == NOTIFICATIONS_COLLECTION
                && index.expire_after_secs == Some(NOTIFICATION_TTL_SECS)
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok("createdAt_1".to_string()));

    client
        .expect_elevate()
        .withf(|credential| credential.username == "root" && credential.source == "admin")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    client.expect_find_user().times(1).in_sequence(&mut seq).returning(|_, _| Ok(None));
    client
        .expect_create_user()
        .withf(|user| {
            user.username == "appUser"
                && user.password == "appPassword123"
                && user.roles == vec![RoleGrant::read_write(NOTIFICATION_SERVICE_DATABASE)]
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    client
}

#[rstest]
#[tokio::test]
async fn fresh_instance_runs_every_step_in_order() {
    let mut provisioner = Provisioner::new(fresh_instance(), ExistingPolicy::Skip);

    let report = provisioner.run(&plan(), &root_credential()).await.expect("provisioning should succeed");

    let outcomes = report.records.iter().map(|r| r.outcome).collect::<Vec<_>>();
    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Created,
            StepOutcome::Created,
            StepOutcome::Created,
            StepOutcome::Created,
            StepOutcome::Authenticated,
            StepOutcome::Created,
        ]
    );
    assert_eq!(report.records[4].step, ProvisionStep::Elevate);
    assert!(!report.is_noop());
}

#[rstest]
#[tokio::test]
async fn rerun_with_skip_policy_changes_nothing() {
    let mut provisioner = Provisioner::new(provisioned_instance(), ExistingPolicy::Skip);

    let report = provisioner.run(&plan(), &root_credential()).await.expect("rerun should succeed");

    assert!(report.is_noop());
    assert_eq!(report.count(StepOutcome::AlreadyPresent), 5);
    assert_eq!(report.count(StepOutcome::Authenticated), 1);
}

#[rstest]
#[tokio::test]
async fn rerun_with_fail_policy_stops_at_first_collection() {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().times(1).returning(|| Ok(both_collections()));
    let mut provisioner = Provisioner::new(client, ExistingPolicy::Fail);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(
        err,
        ProvisionerError::DatabaseCoreError(DatabaseError::CollectionAlreadyExists(ref name)) if name == NOTIFICATIONS_COLLECTION
    );
}

#[rstest]
#[case::skip(ExistingPolicy::Skip)]
#[case::fail(ExistingPolicy::Fail)]
#[tokio::test]
async fn ttl_index_with_other_expiry_is_a_conflict(#[case] policy: ExistingPolicy) {
    fn with_conflicting_ttl() -> Vec<IndexSpec> {
        let mut indexes = provisioned_notification_indexes();
        indexes[2].expire_after_secs = Some(3600);
        indexes
    }

    let mut client = MockAdminClient::new();
    match policy {
        ExistingPolicy::Skip => {
            client.expect_list_collection_names().returning(|| Ok(both_collections()));
            client.expect_list_indexes().returning(|_| Ok(with_conflicting_ttl()));
        }
        // Fail stops at any equivalent object, so the compound index must be created here
        // and the conflicting TTL index only shows up on the second listing.
        ExistingPolicy::Fail => {
            let mut seq = Sequence::new();
            client.expect_list_collection_names().returning(|| Ok(vec![]));
            client.expect_create_collection().times(2).returning(|_| Ok(()));
            client.expect_list_indexes().times(1).in_sequence(&mut seq).returning(|_| Ok(vec![id_index()]));
            client
                .expect_create_index()
                .withf(|_, index| index.keys.len() == 3)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok("userId_1_status_1_createdAt_-1".to_string()));
            client.expect_list_indexes().times(1).in_sequence(&mut seq).returning(|_| Ok(with_conflicting_ttl()));
        }
    }
    let mut provisioner = Provisioner::new(client, policy);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(
        err,
        ProvisionerError::DatabaseCoreError(DatabaseError::IndexConflict { ref keys, ref details, .. })
            if keys == "{ createdAt: 1 }" && details.contains("expireAfterSeconds=3600")
    );
}

#[rstest]
#[tokio::test]
async fn failing_step_aborts_remaining_steps() {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(vec![]));
    client
        .expect_create_collection()
        .withf(|name| name.to_string() == NOTIFICATIONS_COLLECTION)
        .times(1)
        .returning(|_| Ok(()));
    client
        .expect_create_collection()
        .withf(|name| name.to_string() == NOTIFICATION_PREFERENCES_COLLECTION)
        .times(1)
        .returning(|name| Err(DatabaseError::CollectionAlreadyExists(name.to_string())));
    let mut provisioner = Provisioner::new(client, ExistingPolicy::Skip);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(
        err,
        ProvisionerError::DatabaseCoreError(DatabaseError::CollectionAlreadyExists(ref name))
            if name == NOTIFICATION_PREFERENCES_COLLECTION
    );
}

#[rstest]
#[tokio::test]
async fn rejected_root_credential_stops_before_user_management() {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(both_collections()));
    client.expect_list_indexes().returning(|_| Ok(provisioned_notification_indexes()));
    client.expect_elevate().times(1).returning(|credential| {
        Err(DatabaseError::AuthenticationFailed {
            username: credential.username.clone(),
            source_db: credential.source.clone(),
            message: "Authentication failed.".to_string(),
        })
    });
    let mut provisioner = Provisioner::new(client, ExistingPolicy::Skip);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(
        err,
        ProvisionerError::DatabaseCoreError(DatabaseError::AuthenticationFailed { ref username, ref source_db, .. })
            if username == "root" && source_db == "admin"
    );
}

fn provisioned_schema() -> MockAdminClient {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(both_collections()));
    client.expect_list_indexes().returning(|_| Ok(provisioned_notification_indexes()));
    client.expect_elevate().returning(|_| Ok(()));
    client
}

#[rstest]
#[tokio::test]
async fn existing_user_with_other_roles_is_a_conflict() {
    let mut client = provisioned_schema();
    client.expect_find_user().times(1).returning(|_, _| {
        let read_only = RoleGrant { role: "read".to_string(), db: NOTIFICATION_SERVICE_DATABASE.to_string() };
        Ok(Some(app_user_info(vec![read_only])))
    });
    let mut provisioner = Provisioner::new(client, ExistingPolicy::Skip);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(
        err,
        ProvisionerError::DatabaseCoreError(DatabaseError::UserConflict { ref details, .. })
            if details.contains("read@sm_notification_service_db")
    );
}

#[rstest]
#[tokio::test]
async fn existing_user_with_fail_policy_is_rejected() {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(vec![]));
    client.expect_create_collection().times(2).returning(|_| Ok(()));
    client.expect_list_indexes().returning(|_| Ok(vec![id_index()]));
    client.expect_create_index().times(2).returning(|_, index| Ok(index.key_signature()));
    client.expect_elevate().returning(|_| Ok(()));
    client.expect_find_user().returning(|_, _| Ok(Some(provisioned_app_user())));
    let mut provisioner = Provisioner::new(client, ExistingPolicy::Fail);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(
        err,
        ProvisionerError::DatabaseCoreError(DatabaseError::UserAlreadyExists { ref username, .. }) if username == "appUser"
    );
}

#[rstest]
#[tokio::test]
async fn user_lookup_without_elevation_is_reported() {
    let mut client = provisioned_schema();
    client.expect_find_user().returning(|_, _| Err(DatabaseError::NotElevated("usersInfo")));
    let mut provisioner = Provisioner::new(client, ExistingPolicy::Skip);

    let err = provisioner.run(&plan(), &root_credential()).await.unwrap_err();

    assert_matches!(err, ProvisionerError::DatabaseCoreError(DatabaseError::NotElevated("usersInfo")));
}
