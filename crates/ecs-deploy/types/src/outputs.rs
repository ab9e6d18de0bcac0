//! Names of the values a run publishes

/// ARN of the task definition revision registered by the run
pub const TASK_DEFINITION_ARN: &str = "task-definition-arn";

/// Identifier of the CodeDeploy deployment created by the run
pub const CODEDEPLOY_DEPLOYMENT_ID: &str = "codedeploy-deployment-id";
