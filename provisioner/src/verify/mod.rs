//! Post-provisioning checks.
//!
//! Verification never stops at the first problem: every check runs and every
//! mismatch is reported, so one run shows everything that differs from the plan.

use crate::cli::VerifyCmd;
use crate::config::resolve_plan;
use crate::core::client::database::constant::DEFAULT_ID_INDEX;
use crate::core::client::database::mongodb::MongoDbClient;
use crate::core::client::database::AdminClient;
use crate::types::params::{MongoConfig, RootCredential};
use crate::types::plan::ProvisionPlan;
use crate::types::user::describe_roles;
use crate::utils::redact::redact_connection_url;
use crate::{ProvisionerError, ProvisionerResult};
use std::collections::HashSet;
use tracing::{error, info};

pub mod access;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub checks: usize,
    pub problems: Vec<String>,
}

impl VerificationReport {
    fn pass(&mut self) {
        self.checks += 1;
    }

    fn fail(&mut self, problem: String) {
        self.checks += 1;
        self.problems.push(problem);
    }

    pub fn merge(&mut self, other: VerificationReport) {
        self.checks += other.checks;
        self.problems.extend(other.problems);
    }

    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn into_result(self) -> ProvisionerResult<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ProvisionerError::VerificationFailed(self.problems))
        }
    }
}

/// Checks collections and indexes on the session, then elevates and checks the user.
pub async fn verify_plan<C: AdminClient>(
    client: &mut C,
    plan: &ProvisionPlan,
    root: &RootCredential,
) -> ProvisionerResult<VerificationReport> {
    let mut report = VerificationReport::default();

    let existing = client.list_collection_names().await?.into_iter().collect::<HashSet<_>>();
    for collection in &plan.collections {
        if existing.contains(&collection.name) {
            report.pass();
        } else {
            report.fail(format!("collection {} is missing", collection.name));
        }
    }

    for collection in &plan.collections {
        let planned = plan.indexes_for(&collection.name).collect::<Vec<_>>();
        let actual = client.list_indexes(&collection.name).await?;

        for index in &planned {
            match actual.iter().find(|candidate| candidate.same_keys(index)) {
                Some(found) if found.is_equivalent(index) => report.pass(),
                Some(found) => report.fail(format!(
                    "index {} on {} has {}, expected {}",
                    index.key_signature(),
                    collection.name,
                    found.describe_options(),
                    index.describe_options()
                )),
                None => report.fail(format!("index {} on {} is missing", index.key_signature(), collection.name)),
            }
        }

        for found in &actual {
            if found.name.as_deref() == Some(DEFAULT_ID_INDEX) || planned.iter().any(|index| index.same_keys(found)) {
                continue;
            }
            report.fail(format!(
                "unexpected index {} on {} ({})",
                found.key_signature(),
                collection.name,
                found.name.as_deref().unwrap_or("<unnamed>")
            ));
        }
    }

    client.elevate(root).await?;
    let user = &plan.user;
    match client.find_user(&user.database, &user.username).await? {
        Some(info) if info.has_exactly_roles(&user.roles) => report.pass(),
        Some(info) => report.fail(format!(
            "user {}@{} has roles {}, expected {}",
            user.username,
            user.database,
            info.describe_roles(),
            describe_roles(&user.roles)
        )),
        None => report.fail(format!("user {}@{} is missing", user.username, user.database)),
    }

    Ok(report)
}

/// Verifies the instance described by the command line
pub async fn verify(verify_cmd: &VerifyCmd) -> ProvisionerResult<VerificationReport> {
    let target = &verify_cmd.target;
    let mongo_config = MongoConfig::try_from(&target.mongodb_args)?;
    let root = RootCredential::try_from(&target.mongodb_args)?;
    let plan = resolve_plan(target)?;
    let mongo_config = MongoConfig { database_name: plan.database.clone(), ..mongo_config };

    info!(
        url = %redact_connection_url(&mongo_config.connection_url),
        database = %plan.database,
        probe_access = verify_cmd.probe_access,
        "Verifying notification database"
    );

    let mut client = MongoDbClient::new(&mongo_config, &root).await?;
    let mut report = verify_plan(&mut client, &plan, &root).await?;
    if verify_cmd.probe_access {
        report.merge(access::probe_access(&mongo_config, &plan).await?);
    }

    for problem in &report.problems {
        error!("{}", problem);
    }
    info!("Verification ran {} check(s), {} problem(s)", report.checks, report.problems.len());
    report.into_result()
}
