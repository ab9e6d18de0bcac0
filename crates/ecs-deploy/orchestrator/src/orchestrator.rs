//! Deployment orchestration
//!
//! One run registers the task definition, then either stops, updates the
//! service in place, or hands the rollout to CodeDeploy, depending on the
//! service's deployment controller. Every step runs at most once and the
//! first failure ends the run.

use crate::error::{OrchestratorError, Result};
use crate::request::DeployRequest;
use crate::sink::OutputSink;
use crate::state::RunState;
use crate::wait::{deployment_successful, poll_until, services_stable, PollConfig, PollStatus};
use ecs_deploy_appspec::AppSpec;
use ecs_deploy_client::model::{CreateDeploymentInput, RevisionLocation, UpdateServiceInput};
use ecs_deploy_client::{ClientError, CodeDeployApi, EcsApi};
use ecs_deploy_taskdef::{clean, read_task_definition};
use ecs_deploy_types::{
    resolve_in_workspace, ClusterName, DeploymentId, ServiceName, TaskDefinitionArn, WaitPolicy,
    CODEDEPLOY_DEPLOYMENT_ID, MAX_WAIT_MINUTES, TASK_DEFINITION_ARN, WAIT_DEFAULT_DELAY,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Region used for console links when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Service a run rolls out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub cluster: ClusterName,
    pub service: ServiceName,
}

/// What a run does after registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No service given
    RegisterOnly,
    /// Rolling update through `UpdateService`
    DirectUpdate(ServiceTarget),
    /// Blue/green deployment through CodeDeploy
    ControllerHandoff(ServiceTarget),
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub task_definition: TaskDefinitionArn,
    pub target: Target,
    pub deployment_id: Option<DeploymentId>,
    pub waited: bool,
}

/// Drives a deployment run against the provider APIs
pub struct Orchestrator {
    ecs: Arc<dyn EcsApi>,
    codedeploy: Arc<dyn CodeDeployApi>,
    sink: Arc<dyn OutputSink>,
    poll_delay: Duration,
    region: String,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        ecs: Arc<dyn EcsApi>,
        codedeploy: Arc<dyn CodeDeployApi>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            ecs,
            codedeploy,
            sink,
            poll_delay: WAIT_DEFAULT_DELAY,
            region: DEFAULT_REGION.to_string(),
            state: RunState::Idle,
        }
    }

    /// Delay between two polls of a wait
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    /// Region used in console links
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute a run and report its failure, if any, to the sink.
    pub async fn run(&mut self, request: &DeployRequest) -> Result<RunReport> {
        self.state = RunState::Idle;

        match self.execute(request).await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.transition(RunState::Failed);
                self.sink.set_failed(&err.to_string());
                Err(err)
            }
        }
    }

    async fn execute(&mut self, request: &DeployRequest) -> Result<RunReport> {
        let path = resolve_in_workspace(&request.workspace, &request.task_definition);
        let task_definition = clean(read_task_definition(&path)?);

        let arn = self.register(&task_definition).await?;
        let target = self
            .resolve_target(request.service.as_ref(), &request.cluster)
            .await?;

        let mut report = RunReport {
            task_definition: arn.clone(),
            target: target.clone(),
            deployment_id: None,
            waited: false,
        };

        match &target {
            Target::RegisterOnly => {
                debug!("No service given, registration only");
            }
            Target::DirectUpdate(service) => {
                report.waited = self.update_service(service, &arn, &request.wait).await?;
            }
            Target::ControllerHandoff(service) => {
                let (deployment_id, waited) = self
                    .create_controller_deployment(service, &arn, request)
                    .await?;
                report.deployment_id = Some(deployment_id);
                report.waited = waited;
            }
        }

        self.transition(RunState::Done);
        Ok(report)
    }

    /// Register the cleaned task definition and publish its ARN.
    #[instrument(skip_all)]
    pub async fn register(&mut self, task_definition: &Value) -> Result<TaskDefinitionArn> {
        self.transition(RunState::Registering);

        let arn = self
            .ecs
            .register_task_definition(task_definition)
            .await
            .map_err(|e| {
                debug!(code = e.code().unwrap_or_default(), "RegisterTaskDefinition rejected");
                e.to_string()
            })
            .and_then(|output| {
                output
                    .task_definition_arn()
                    .map(TaskDefinitionArn::new)
                    .ok_or_else(|| "RegisterTaskDefinition returned no task definition ARN".into())
            });

        let arn = match arn {
            Ok(arn) => arn,
            Err(message) => {
                self.sink.set_failed(&format!(
                    "Failed to register task definition in ECS: {}",
                    message
                ));
                debug!(
                    task_definition = %task_definition,
                    "Task definition contents"
                );
                return Err(OrchestratorError::Registration(message));
            }
        };

        info!(task_definition = %arn, "Registered task definition");
        self.sink.set_output(TASK_DEFINITION_ARN, arn.as_str());
        self.transition(RunState::Registered);
        Ok(arn)
    }

    /// Decide what to do with the registered revision.
    #[instrument(skip(self))]
    pub async fn resolve_target(
        &self,
        service: Option<&ServiceName>,
        cluster: &ClusterName,
    ) -> Result<Target> {
        let Some(service) = service else {
            return Ok(Target::RegisterOnly);
        };

        let output = self
            .ecs
            .describe_services(cluster, std::slice::from_ref(service))
            .await
            .map_err(|e| OrchestratorError::ServiceLookup(e.to_string()))?;

        if let Some(failure) = output.failures.first() {
            return Err(OrchestratorError::ServiceLookup(format!(
                "{} is {}",
                failure.arn.as_deref().unwrap_or_default(),
                failure.reason.as_deref().unwrap_or_default()
            )));
        }

        let Some(live) = output.services.first() else {
            return Err(OrchestratorError::ServiceLookup(format!(
                "Service {} not found in cluster {}",
                service, cluster
            )));
        };

        if !live.is_active() {
            return Err(OrchestratorError::ServiceLookup(format!(
                "Service is {}",
                live.status()
            )));
        }

        let target = ServiceTarget {
            cluster: cluster.clone(),
            service: service.clone(),
        };
        let controller = live.controller();
        debug!(controller = %controller, "Resolved deployment controller");

        if controller.is_code_deploy() {
            Ok(Target::ControllerHandoff(target))
        } else {
            Ok(Target::DirectUpdate(target))
        }
    }

    /// Point the service at `arn`, then optionally wait for it to settle.
    /// Returns whether a wait took place.
    #[instrument(skip(self, wait), fields(cluster = %target.cluster, service = %target.service))]
    pub async fn update_service(
        &mut self,
        target: &ServiceTarget,
        arn: &TaskDefinitionArn,
        wait: &WaitPolicy,
    ) -> Result<bool> {
        self.transition(RunState::UpdatingService);

        let input = UpdateServiceInput {
            cluster: target.cluster.to_string(),
            service: target.service.to_string(),
            task_definition: arn.to_string(),
            force_new_deployment: wait.force_new_deployment,
        };
        self.ecs
            .update_service(&input)
            .await
            .map_err(|e| OrchestratorError::Submission(e.to_string()))?;

        info!(
            url = %self.service_console_url(target),
            "Deployment started. Watch this deployment's progress in the Amazon ECS console"
        );

        if !wait.wait_for_service_stability {
            return Ok(false);
        }

        self.transition(RunState::Waiting);
        info!(
            minutes = wait.wait_for_minutes,
            "Waiting for the service to become stable"
        );

        let ecs = self.ecs.as_ref();
        let cluster = &target.cluster;
        let services = std::slice::from_ref(&target.service);
        let config = PollConfig::new(self.poll_delay, wait.max_wait());

        poll_until("services stable", &config, move || {
            probe_services(ecs, cluster, services)
        })
        .await?;

        info!("Service is stable");
        Ok(true)
    }

    /// Hand the rollout to CodeDeploy, then optionally wait for the
    /// deployment to finish. Returns the deployment id and whether a wait
    /// took place.
    #[instrument(skip(self, request), fields(cluster = %target.cluster, service = %target.service))]
    pub async fn create_controller_deployment(
        &mut self,
        target: &ServiceTarget,
        arn: &TaskDefinitionArn,
        request: &DeployRequest,
    ) -> Result<(DeploymentId, bool)> {
        self.transition(RunState::CreatingControllerDeployment);

        let options = &request.codedeploy;
        let application = options.application_name(&target.cluster, &target.service);
        let deployment_group = options.deployment_group_name(&target.cluster, &target.service);

        let group = self
            .codedeploy
            .get_deployment_group(&application, &deployment_group)
            .await
            .map_err(submission)?
            .deployment_group_info
            .unwrap_or_default();

        let appspec_path = resolve_in_workspace(&request.workspace, options.appspec_path());
        let mut appspec = AppSpec::read(&appspec_path).map_err(submission)?;
        appspec
            .substitute_task_definition(arn)
            .map_err(submission)?;
        debug!(
            path = %appspec_path.display(),
            task_definitions = ?appspec.task_definitions(),
            "Prepared AppSpec"
        );
        let content = appspec.content().map_err(submission)?;

        let input = CreateDeploymentInput {
            application_name: application,
            deployment_group_name: deployment_group,
            revision: RevisionLocation::app_spec_content(content.content, content.sha256),
            description: options.description.clone(),
        };
        let output = self
            .codedeploy
            .create_deployment(&input)
            .await
            .map_err(submission)?;

        let deployment_id = output.deployment_id.map(DeploymentId::new).ok_or_else(|| {
            OrchestratorError::Submission("CreateDeployment returned no deployment id".into())
        })?;

        self.sink
            .set_output(CODEDEPLOY_DEPLOYMENT_ID, deployment_id.as_str());
        info!(
            deployment_id = %deployment_id,
            url = %self.deployment_console_url(&deployment_id),
            "Deployment started. Watch this deployment's progress in the AWS CodeDeploy console"
        );

        if !request.wait.wait_for_service_stability {
            return Ok((deployment_id, false));
        }

        self.transition(RunState::Waiting);
        let minutes = group
            .blue_green_wait_minutes()
            .saturating_add(request.wait.wait_for_minutes)
            .min(MAX_WAIT_MINUTES);
        info!(minutes, "Waiting for the deployment to complete");

        let codedeploy = self.codedeploy.as_ref();
        let id = &deployment_id;
        let config = PollConfig::new(
            self.poll_delay,
            ecs_deploy_types::wait::minutes(minutes),
        );

        poll_until("deployment successful", &config, move || {
            probe_deployment(codedeploy, id)
        })
        .await?;

        info!(deployment_id = %deployment_id, "Deployment succeeded");
        Ok((deployment_id, true))
    }

    fn transition(&mut self, next: RunState) {
        if !self.state.can_transition_to(&next) {
            warn!(from = %self.state, to = %next, "Unexpected run state transition");
        }
        debug!(from = %self.state, to = %next, "Run state transition");
        self.state = next;
    }

    fn service_console_url(&self, target: &ServiceTarget) -> String {
        format!(
            "https://console.aws.amazon.com/ecs/home?region={}#/clusters/{}/services/{}/events",
            self.region, target.cluster, target.service
        )
    }

    fn deployment_console_url(&self, deployment_id: &DeploymentId) -> String {
        format!(
            "https://console.aws.amazon.com/codesuite/codedeploy/deployments/{}?region={}",
            deployment_id, self.region
        )
    }
}

fn submission(err: impl ToString) -> OrchestratorError {
    OrchestratorError::Submission(err.to_string())
}

async fn probe_services(
    ecs: &dyn EcsApi,
    cluster: &ClusterName,
    services: &[ServiceName],
) -> std::result::Result<PollStatus, ClientError> {
    let output = ecs.describe_services(cluster, services).await?;
    Ok(services_stable(&output))
}

async fn probe_deployment(
    codedeploy: &dyn CodeDeployApi,
    deployment_id: &DeploymentId,
) -> std::result::Result<PollStatus, ClientError> {
    let output = codedeploy.get_deployment(deployment_id).await?;
    Ok(deployment_successful(&output))
}
