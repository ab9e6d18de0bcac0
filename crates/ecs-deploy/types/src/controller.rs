//! Deployment controller of a live ECS service

use serde::{Deserialize, Serialize};

/// How a service rolls out new task definition revisions.
///
/// Closed set: the provider's `deploymentController.type` is mapped once,
/// and anything that is not `CODE_DEPLOY` is treated as a standard rolling
/// update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeploymentController {
    /// Rolling update driven by ECS itself
    #[default]
    Ecs,

    /// Blue/green deployment handed off to CodeDeploy
    CodeDeploy,
}

impl DeploymentController {
    /// Provider tag for CodeDeploy-managed services
    pub const CODE_DEPLOY_TYPE: &'static str = "CODE_DEPLOY";

    /// Map the provider-reported controller type.
    pub fn from_type(controller_type: Option<&str>) -> Self {
        match controller_type {
            Some(Self::CODE_DEPLOY_TYPE) => DeploymentController::CodeDeploy,
            _ => DeploymentController::Ecs,
        }
    }

    /// Does this controller hand the rollout to CodeDeploy?
    pub fn is_code_deploy(&self) -> bool {
        matches!(self, DeploymentController::CodeDeploy)
    }
}

impl std::fmt::Display for DeploymentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentController::Ecs => write!(f, "ECS"),
            DeploymentController::CodeDeploy => write!(f, "CODE_DEPLOY"),
        }
    }
}
