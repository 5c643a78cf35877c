pub mod env_interpolation;

use crate::cli::TargetArgs;
use crate::types::plan::ProvisionPlan;
use crate::ProvisionerResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Versioned plan file wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "plan_version")]
pub enum PlanFileVersioned {
    #[serde(rename = "1")]
    V1(ProvisionPlan),
}

impl PlanFileVersioned {
    /// Load a plan from a YAML file, interpolating `${VAR}` references from the environment
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read plan file: {}", path.display()))?;

        Self::from_yaml_str_with_env(&content, |name| std::env::var(name).ok())
            .with_context(|| format!("Failed to load plan file: {}", path.display()))
    }

    /// Load a plan from a YAML string, without interpolation
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::from_yaml_value(Self::parse(content)?)
    }

    /// Load a plan from a YAML string, resolving `${VAR}` references in its string values with `lookup`
    pub fn from_yaml_str_with_env<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let yaml_value = env_interpolation::interpolate_yaml_value(Self::parse(content)?, lookup)?;
        Self::from_yaml_value(yaml_value)
    }

    fn parse(content: &str) -> Result<serde_yaml::Value> {
        serde_yaml::from_str(content).context("Failed to parse YAML")
    }

    fn from_yaml_value(yaml_value: serde_yaml::Value) -> Result<Self> {
        if yaml_value.get("plan_version").is_none() {
            anyhow::bail!(
                "Missing required field 'plan_version' in plan file. \
                 Current supported version: 1"
            );
        }

        let versioned: PlanFileVersioned = serde_yaml::from_value(yaml_value).context("Failed to deserialize plan")?;
        Ok(versioned)
    }

    pub fn into_plan(self) -> ProvisionPlan {
        match self {
            PlanFileVersioned::V1(plan) => plan,
        }
    }
}

/// Builds the plan a command works on: the plan file when one is given, the built-in
/// notification service plan otherwise. The plan is validated before it is returned.
pub fn resolve_plan(target: &TargetArgs) -> ProvisionerResult<ProvisionPlan> {
    let plan = match &target.plan_file {
        Some(path) => {
            info!(path = %path.display(), "Loading provisioning plan from file");
            PlanFileVersioned::from_yaml_file(path)?.into_plan()
        }
        None => ProvisionPlan::notification_service_with(
            target.mongodb_args.mongodb_database_name.trim(),
            &target.app_user_args.app_username,
            &target.app_user_args.app_password,
        ),
    };
    plan.validate()?;
    Ok(plan)
}
