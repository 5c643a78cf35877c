use crate::cli::ProvisionCmd;
use crate::config::resolve_plan;
use crate::core::client::database::mongodb::MongoDbClient;
use crate::core::client::database::AdminClient;
use crate::types::params::{MongoConfig, RootCredential};
use crate::types::plan::ProvisionPlan;
use crate::utils::redact::redact_connection_url;
use crate::ProvisionerResult;
use step::{ProvisionReport, ProvisionStep, StepOutcome};
use tracing::{debug, info, info_span, Instrument};

mod collection;
mod credential;
mod index;
pub mod step;

/// What to do when a planned object already exists with the planned definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistingPolicy {
    /// Leave it alone and continue with the next step.
    #[default]
    Skip,
    /// Abort the run.
    Fail,
}

impl ExistingPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ExistingPolicy::Fail
        } else {
            ExistingPolicy::Skip
        }
    }
}

/// Runs a plan step by step against an [`AdminClient`].
///
/// The first failing step aborts the run. Nothing is rolled back.
pub struct Provisioner<C> {
    client: C,
    policy: ExistingPolicy,
}

impl<C: AdminClient> Provisioner<C> {
    pub fn new(client: C, policy: ExistingPolicy) -> Self {
        Self { client, policy }
    }

    pub fn into_client(self) -> C {
        self.client
    }

    pub async fn run(&mut self, plan: &ProvisionPlan, root: &RootCredential) -> ProvisionerResult<ProvisionReport> {
        let mut report = ProvisionReport::default();
        for step in ProvisionStep::sequence(plan) {
            let kind: &'static str = (&step).into();
            let span = info_span!("provision", step = kind, object = %step.object());
            let outcome = self.execute(&step, root).instrument(span).await?;
            debug!(step = kind, outcome = %outcome, "Step finished");
            report.push(step, outcome);
        }
        Ok(report)
    }

    async fn execute(&mut self, step: &ProvisionStep, root: &RootCredential) -> ProvisionerResult<StepOutcome> {
        match step {
            ProvisionStep::CreateCollection { name } => {
                collection::ensure_collection(&self.client, name, self.policy).await
            }
            ProvisionStep::CreateIndex { collection: target, index: spec } => {
                index::ensure_index(&self.client, target, spec, self.policy).await
            }
            ProvisionStep::Elevate => credential::elevate(&mut self.client, root).await,
            ProvisionStep::CreateUser { user } => credential::ensure_user(&self.client, user, self.policy).await,
        }
    }
}

/// Provisions the instance described by the command line
pub async fn provision(provision_cmd: &ProvisionCmd) -> ProvisionerResult<ProvisionReport> {
    let target = &provision_cmd.target;
    let mongo_config = MongoConfig::try_from(&target.mongodb_args)?;
    let root = RootCredential::try_from(&target.mongodb_args)?;
    let plan = resolve_plan(target)?;
    let policy = ExistingPolicy::from_strict(provision_cmd.strict);

    info!(
        url = %redact_connection_url(&mongo_config.connection_url),
        database = %plan.database,
        policy = ?policy,
        "Provisioning notification database"
    );

    let session_config = MongoConfig { database_name: plan.database.clone(), ..mongo_config };
    let client = MongoDbClient::new(&session_config, &root).await?;
    client.ping().await?;

    let mut provisioner = Provisioner::new(client, policy);
    let report = provisioner.run(&plan, &root).await?;
    info!("Provisioning finished: {}", report);
    Ok(report)
}
