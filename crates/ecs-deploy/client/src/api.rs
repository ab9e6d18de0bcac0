//! Provider API seams
//!
//! The orchestrator only talks to these traits, so tests substitute
//! in-memory fakes for the HTTP clients.

use crate::error::Result;
use crate::model::*;
use async_trait::async_trait;
use ecs_deploy_types::{ClusterName, DeploymentId, ServiceName};
use serde_json::Value;

/// ECS operations used by a deployment run
#[async_trait]
pub trait EcsApi: Send + Sync {
    /// Register a cleaned task definition as a new revision
    async fn register_task_definition(
        &self,
        task_definition: &Value,
    ) -> Result<RegisterTaskDefinitionOutput>;

    /// Describe services of a cluster
    async fn describe_services(
        &self,
        cluster: &ClusterName,
        services: &[ServiceName],
    ) -> Result<DescribeServicesOutput>;

    /// Point a service at a task definition revision
    async fn update_service(&self, input: &UpdateServiceInput) -> Result<UpdateServiceOutput>;
}

/// CodeDeploy operations used by a blue/green handoff
#[async_trait]
pub trait CodeDeployApi: Send + Sync {
    async fn get_deployment_group(
        &self,
        application: &str,
        deployment_group: &str,
    ) -> Result<GetDeploymentGroupOutput>;

    async fn create_deployment(&self, input: &CreateDeploymentInput)
        -> Result<CreateDeploymentOutput>;

    async fn get_deployment(&self, deployment_id: &DeploymentId) -> Result<GetDeploymentOutput>;
}
