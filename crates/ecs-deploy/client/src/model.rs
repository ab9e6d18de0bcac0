//! Wire model for the ECS and CodeDeploy JSON APIs
//!
//! Only the fields the deployment flow reads or writes are modelled; unknown
//! response fields are ignored. Everything the provider may omit is an
//! `Option` or defaults to empty.

use ecs_deploy_types::DeploymentController;
use serde::{Deserialize, Serialize};

// ========== ECS ==========

/// `RegisterTaskDefinition` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTaskDefinitionOutput {
    pub task_definition: Option<RegisteredTaskDefinition>,
}

impl RegisterTaskDefinitionOutput {
    /// ARN of the new revision, if the provider returned one
    pub fn task_definition_arn(&self) -> Option<&str> {
        self.task_definition
            .as_ref()
            .and_then(|td| td.task_definition_arn.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredTaskDefinition {
    pub task_definition_arn: Option<String>,
    pub family: Option<String>,
    pub revision: Option<i64>,
}

/// `DescribeServices` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeServicesInput {
    pub cluster: String,
    pub services: Vec<String>,
}

/// `DescribeServices` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeServicesOutput {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

/// Per-resource failure in a describe response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub arn: Option<String>,
    pub reason: Option<String>,
    pub detail: Option<String>,
}

/// Failure reason for a service that does not exist
pub const FAILURE_MISSING: &str = "MISSING";

/// A live ECS service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_name: Option<String>,
    pub service_arn: Option<String>,
    pub status: Option<String>,
    pub deployment_controller: Option<DeploymentControllerInfo>,
    #[serde(default)]
    pub deployments: Vec<Deployment>,
    #[serde(default)]
    pub running_count: i64,
    #[serde(default)]
    pub desired_count: i64,
}

impl Service {
    pub const STATUS_ACTIVE: &'static str = "ACTIVE";
    pub const STATUS_DRAINING: &'static str = "DRAINING";
    pub const STATUS_INACTIVE: &'static str = "INACTIVE";

    /// Controller that rolls out new revisions for this service
    pub fn controller(&self) -> DeploymentController {
        DeploymentController::from_type(
            self.deployment_controller
                .as_ref()
                .and_then(|c| c.controller_type.as_deref()),
        )
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.status() == Self::STATUS_ACTIVE
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeploymentControllerInfo {
    #[serde(rename = "type")]
    pub controller_type: Option<String>,
}

/// One rollout of a service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: Option<String>,
    pub status: Option<String>,
    pub task_definition: Option<String>,
    pub rollout_state: Option<String>,
}

/// `UpdateService` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceInput {
    pub cluster: String,
    pub service: String,
    pub task_definition: String,
    pub force_new_deployment: bool,
}

/// `UpdateService` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceOutput {
    pub service: Option<Service>,
}

// ========== CodeDeploy ==========

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentGroupInput {
    pub application_name: String,
    pub deployment_group_name: String,
}

/// `GetDeploymentGroup` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentGroupOutput {
    pub deployment_group_info: Option<DeploymentGroupInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentGroupInfo {
    pub application_name: Option<String>,
    pub deployment_group_name: Option<String>,
    pub blue_green_deployment_configuration: Option<BlueGreenDeploymentConfiguration>,
}

impl DeploymentGroupInfo {
    /// Minutes the blue/green configuration itself may take: the wait for
    /// traffic rerouting plus the delay before the blue tasks terminate.
    /// Missing settings count as zero.
    pub fn blue_green_wait_minutes(&self) -> u32 {
        let Some(config) = &self.blue_green_deployment_configuration else {
            return 0;
        };
        let ready = config
            .deployment_ready_option
            .as_ref()
            .and_then(|o| o.wait_time_in_minutes)
            .unwrap_or(0);
        let termination = config
            .terminate_blue_instances_on_deployment_success
            .as_ref()
            .and_then(|o| o.termination_wait_time_in_minutes)
            .unwrap_or(0);
        ready.saturating_add(termination)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueGreenDeploymentConfiguration {
    pub deployment_ready_option: Option<DeploymentReadyOption>,
    pub terminate_blue_instances_on_deployment_success: Option<BlueInstanceTerminationOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReadyOption {
    pub action_on_timeout: Option<String>,
    pub wait_time_in_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueInstanceTerminationOption {
    pub action: Option<String>,
    pub termination_wait_time_in_minutes: Option<u32>,
}

/// `CreateDeployment` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentInput {
    pub application_name: String,
    pub deployment_group_name: String,
    pub revision: RevisionLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Revision submitted inline as AppSpec content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionLocation {
    pub revision_type: String,
    pub app_spec_content: AppSpecContentInput,
}

impl RevisionLocation {
    pub const APP_SPEC_CONTENT: &'static str = "AppSpecContent";

    pub fn app_spec_content(content: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            revision_type: Self::APP_SPEC_CONTENT.to_string(),
            app_spec_content: AppSpecContentInput {
                content: content.into(),
                sha256: sha256.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSpecContentInput {
    pub content: String,
    pub sha256: String,
}

/// `CreateDeployment` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentOutput {
    pub deployment_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentInput {
    pub deployment_id: String,
}

/// `GetDeployment` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeploymentOutput {
    pub deployment_info: Option<DeploymentInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    pub deployment_id: Option<String>,
    pub status: Option<String>,
    pub error_information: Option<ErrorInformation>,
}

impl DeploymentInfo {
    pub const STATUS_SUCCEEDED: &'static str = "Succeeded";
    pub const STATUS_FAILED: &'static str = "Failed";
    pub const STATUS_STOPPED: &'static str = "Stopped";

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInformation {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_controller_mapping() {
        let service: Service = serde_json::from_value(json!({
            "serviceName": "web",
            "status": "ACTIVE",
            "deploymentController": { "type": "CODE_DEPLOY" }
        }))
        .unwrap();
        assert_eq!(service.controller(), DeploymentController::CodeDeploy);
        assert!(service.is_active());

        let service: Service =
            serde_json::from_value(json!({ "serviceName": "web", "status": "DRAINING" })).unwrap();
        assert_eq!(service.controller(), DeploymentController::Ecs);
        assert!(!service.is_active());
        assert_eq!(service.running_count, 0);
    }

    #[test]
    fn test_blue_green_wait_minutes() {
        let info: DeploymentGroupInfo = serde_json::from_value(json!({
            "blueGreenDeploymentConfiguration": {
                "deploymentReadyOption": { "waitTimeInMinutes": 10 },
                "terminateBlueInstancesOnDeploymentSuccess": { "terminationWaitTimeInMinutes": 5 }
            }
        }))
        .unwrap();
        assert_eq!(info.blue_green_wait_minutes(), 15);

        let info: DeploymentGroupInfo = serde_json::from_value(json!({
            "blueGreenDeploymentConfiguration": { "deploymentReadyOption": {} }
        }))
        .unwrap();
        assert_eq!(info.blue_green_wait_minutes(), 0);
        assert_eq!(DeploymentGroupInfo::default().blue_green_wait_minutes(), 0);
    }

    #[test]
    fn test_create_deployment_input_wire_shape() {
        let input = CreateDeploymentInput {
            application_name: "AppECS-default-web".into(),
            deployment_group_name: "DgpECS-default-web".into(),
            revision: RevisionLocation::app_spec_content("{}", "abc"),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "applicationName": "AppECS-default-web",
                "deploymentGroupName": "DgpECS-default-web",
                "revision": {
                    "revisionType": "AppSpecContent",
                    "appSpecContent": { "content": "{}", "sha256": "abc" }
                }
            })
        );
    }

    #[test]
    fn test_update_service_input_wire_shape() {
        let input = UpdateServiceInput {
            cluster: "default".into(),
            service: "web".into(),
            task_definition: "task:def:arn".into(),
            force_new_deployment: true,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "cluster": "default",
                "service": "web",
                "taskDefinition": "task:def:arn",
                "forceNewDeployment": true
            })
        );
    }
}
