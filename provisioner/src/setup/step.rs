use crate::types::index::IndexSpec;
use crate::types::plan::ProvisionPlan;
use crate::types::user::UserSpec;
use std::fmt;
use strum_macros::{Display, IntoStaticStr};

/// One administrative action of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProvisionStep {
    CreateCollection { name: String },
    CreateIndex { collection: String, index: IndexSpec },
    /// Re-authenticate as the root principal before managing users.
    Elevate,
    CreateUser { user: UserSpec },
}

impl ProvisionStep {
    /// Orders the plan into steps: collections, then indexes, then elevation, then the user.
    pub fn sequence(plan: &ProvisionPlan) -> Vec<ProvisionStep> {
        let mut steps = Vec::with_capacity(plan.collections.len() + plan.indexes.len() + 2);
        steps.extend(plan.collections.iter().map(|c| ProvisionStep::CreateCollection { name: c.name.clone() }));
        steps.extend(plan.indexes.iter().map(|i| ProvisionStep::CreateIndex {
            collection: i.collection.clone(),
            index: i.index.clone(),
        }));
        steps.push(ProvisionStep::Elevate);
        steps.push(ProvisionStep::CreateUser { user: plan.user.clone() });
        steps
    }

    /// Short description of the object the step acts on.
    pub fn object(&self) -> String {
        match self {
            ProvisionStep::CreateCollection { name } => name.clone(),
            ProvisionStep::CreateIndex { collection, index } => format!("{} {}", collection, index.key_signature()),
            ProvisionStep::Elevate => "admin session".to_string(),
            ProvisionStep::CreateUser { user } => format!("{}@{}", user.username, user.database),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StepOutcome {
    Created,
    AlreadyPresent,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: ProvisionStep,
    pub outcome: StepOutcome,
}

/// What a provisioning run did, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub records: Vec<StepRecord>,
}

impl ProvisionReport {
    pub fn push(&mut self, step: ProvisionStep, outcome: StepOutcome) {
        self.records.push(StepRecord { step, outcome });
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    /// True when nothing was created, i.e. the instance was already provisioned.
    pub fn is_noop(&self) -> bool {
        self.count(StepOutcome::Created) == 0
    }
}

impl fmt::Display for ProvisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} step(s): {} created, {} already present",
            self.records.len(),
            self.count(StepOutcome::Created),
            self.count(StepOutcome::AlreadyPresent)
        )
    }
}
