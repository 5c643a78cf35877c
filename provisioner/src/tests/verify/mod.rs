use crate::core::client::database::constant::NOTIFICATIONS_COLLECTION;
use crate::core::client::database::MockAdminClient;
use crate::tests::common::{
    app_user_info, both_collections, id_index, plan, provisioned_instance, provisioned_notification_indexes,
    root_credential,
};
use crate::types::index::{IndexKey, IndexSpec};
use crate::verify::verify_plan;
use crate::ProvisionerError;
use assert_matches::assert_matches;
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn provisioned_instance_passes_every_check() {
    let mut client = provisioned_instance();

    let report = verify_plan(&mut client, &plan(), &root_credential()).await.expect("verification should run");

    // two collections, two indexes, one user
    assert_eq!(report.checks, 5);
    assert!(report.is_ok(), "unexpected problems: {:?}", report.problems);
}

#[rstest]
#[tokio::test]
async fn empty_instance_reports_every_missing_object() {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(vec![]));
    client.expect_list_indexes().returning(|_| Ok(vec![]));
    client.expect_elevate().times(1).returning(|_| Ok(()));
    client.expect_find_user().returning(|_, _| Ok(None));

    let report = verify_plan(&mut client, &plan(), &root_credential()).await.expect("verification should run");

    assert_eq!(
        report.problems,
        vec![
            "collection notifications is missing",
            "collection notification_preferences is missing",
            "index { userId: 1, status: 1, createdAt: -1 } on notifications is missing",
            "index { createdAt: 1 } on notifications is missing",
            "user appUser@sm_notification_service_db is missing",
        ]
    );
    assert_matches!(report.into_result(), Err(ProvisionerError::VerificationFailed(problems)) if problems.len() == 5);
}

#[rstest]
#[tokio::test]
async fn drifted_indexes_and_roles_are_reported_together() {
    let mut client = MockAdminClient::new();
    client.expect_list_collection_names().returning(|| Ok(both_collections()));
    client.expect_list_indexes().returning(|collection| {
        if collection.to_string() != NOTIFICATIONS_COLLECTION {
            return Ok(vec![id_index()]);
        }
        let mut indexes = provisioned_notification_indexes();
        indexes[2].expire_after_secs = None;
        indexes.push(IndexSpec { name: Some("title_1".to_string()), ..IndexSpec::new(vec![IndexKey::ascending("title")]) });
        Ok(indexes)
    });
    client.expect_elevate().returning(|_| Ok(()));
    client.expect_find_user().returning(|_, _| Ok(Some(app_user_info(vec![]))));

    let report = verify_plan(&mut client, &plan(), &root_credential()).await.expect("verification should run");

    assert_eq!(report.checks, 6);
    assert_eq!(
        report.problems,
        vec![
            "index { createdAt: 1 } on notifications has unique=false, no expiry, expected unique=false, \
             expireAfterSeconds=604800",
            "unexpected index { title: 1 } on notifications (title_1)",
            "user appUser@sm_notification_service_db has roles [], expected [readWrite@sm_notification_service_db]",
        ]
    );
}
