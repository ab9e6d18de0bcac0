//! Named inputs
//!
//! Every input is looked up by name: first the command-line flag of the same
//! name, then the `INPUT_<NAME>` environment variable set by workflow
//! runners. Empty values count as unset.

use crate::error::{CliError, CliResult};
use std::collections::BTreeMap;

pub const TASK_DEFINITION: &str = "task-definition";
pub const SERVICE: &str = "service";
pub const CLUSTER: &str = "cluster";
pub const WAIT_FOR_SERVICE_STABILITY: &str = "wait-for-service-stability";
pub const WAIT_FOR_MINUTES: &str = "wait-for-minutes";
pub const FORCE_NEW_DEPLOYMENT: &str = "force-new-deployment";
pub const CODEDEPLOY_APPSPEC: &str = "codedeploy-appspec";
pub const CODEDEPLOY_APPLICATION: &str = "codedeploy-application";
pub const CODEDEPLOY_DEPLOYMENT_GROUP: &str = "codedeploy-deployment-group";
pub const CODEDEPLOY_DEPLOYMENT_DESCRIPTION: &str = "codedeploy-deployment-description";

/// Environment variable carrying the input `name`
pub fn env_var_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Resolved named inputs
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    values: BTreeMap<String, String>,
}

impl Inputs {
    /// Resolve inputs from flag values, falling back to `env` for the ones
    /// not given on the command line.
    pub fn resolve<'a, F>(flags: impl IntoIterator<Item = (&'a str, Option<String>)>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();

        for (name, flag) in flags {
            let value = non_empty(flag).or_else(|| non_empty(env(&env_var_name(name))));
            if let Some(value) = value {
                values.insert(name.to_string(), value);
            }
        }

        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> CliResult<&str> {
        self.get(name).ok_or_else(|| {
            CliError::InvalidInput(format!("Input required and not supplied: {}", name))
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
