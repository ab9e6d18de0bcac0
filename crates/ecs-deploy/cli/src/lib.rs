//! ecs-deploy CLI - Register an ECS task definition and roll it out
//!
//! This CLI:
//! - Registers the task definition file as a new revision
//! - Updates the target service in place, or
//! - Hands the rollout to CodeDeploy for blue/green services
//! - Optionally waits for the service or deployment to settle
//!
//! Inputs are taken from flags or `INPUT_<NAME>` environment variables;
//! outputs go to stdout and the `GITHUB_OUTPUT` file.

use clap::Parser;
use ecs_deploy_client::{CodeDeployClient, EcsClient, DEFAULT_TIMEOUT};
use ecs_deploy_orchestrator::{
    CodeDeployOptions, DeployRequest, Orchestrator, OutputSink, DEFAULT_REGION,
};
use ecs_deploy_types::{ClusterName, ServiceName, WaitPolicy, WAIT_DEFAULT_DELAY};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod inputs;
mod output;

use config::CliConfig;
pub use error::{CliError, CliResult};
use inputs::Inputs;
use output::ConsoleSink;

/// ecs-deploy CLI application
#[derive(Parser, Debug)]
#[command(name = "ecs-deploy")]
#[command(about = "Register an ECS task definition and deploy it to a service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the task definition file (JSON or YAML)
    #[arg(long)]
    task_definition: Option<String>,

    /// ECS service to deploy to; omit to only register the task definition
    #[arg(long)]
    service: Option<String>,

    /// ECS cluster of the service
    #[arg(long)]
    cluster: Option<String>,

    /// Wait for the service (or CodeDeploy deployment) to become stable
    #[arg(long)]
    wait_for_service_stability: Option<String>,

    /// How long to wait, in minutes (default 30, max 360)
    #[arg(long)]
    wait_for_minutes: Option<String>,

    /// Force a new deployment of the service
    #[arg(long)]
    force_new_deployment: Option<String>,

    /// AppSpec file for CodeDeploy deployments
    #[arg(long)]
    codedeploy_appspec: Option<String>,

    /// CodeDeploy application name
    #[arg(long)]
    codedeploy_application: Option<String>,

    /// CodeDeploy deployment group name
    #[arg(long)]
    codedeploy_deployment_group: Option<String>,

    /// Description of the CodeDeploy deployment
    #[arg(long)]
    codedeploy_deployment_description: Option<String>,

    /// Base directory for relative file paths
    #[arg(long, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "ECS_DEPLOY_CONFIG")]
    config: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// ECS API endpoint
    #[arg(long, env = "ECS_DEPLOY_ECS_ENDPOINT")]
    ecs_endpoint: Option<String>,

    /// CodeDeploy API endpoint
    #[arg(long, env = "ECS_DEPLOY_CODEDEPLOY_ENDPOINT")]
    codedeploy_endpoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn inputs(&self) -> Inputs {
        Inputs::resolve(
            [
                (inputs::TASK_DEFINITION, self.task_definition.clone()),
                (inputs::SERVICE, self.service.clone()),
                (inputs::CLUSTER, self.cluster.clone()),
                (
                    inputs::WAIT_FOR_SERVICE_STABILITY,
                    self.wait_for_service_stability.clone(),
                ),
                (inputs::WAIT_FOR_MINUTES, self.wait_for_minutes.clone()),
                (inputs::FORCE_NEW_DEPLOYMENT, self.force_new_deployment.clone()),
                (inputs::CODEDEPLOY_APPSPEC, self.codedeploy_appspec.clone()),
                (
                    inputs::CODEDEPLOY_APPLICATION,
                    self.codedeploy_application.clone(),
                ),
                (
                    inputs::CODEDEPLOY_DEPLOYMENT_GROUP,
                    self.codedeploy_deployment_group.clone(),
                ),
                (
                    inputs::CODEDEPLOY_DEPLOYMENT_DESCRIPTION,
                    self.codedeploy_deployment_description.clone(),
                ),
            ],
            |name| std::env::var(name).ok(),
        )
    }
}

/// Build the run parameters from resolved inputs
fn deploy_request(inputs: &Inputs, workspace: PathBuf) -> CliResult<DeployRequest> {
    let task_definition = inputs.required(inputs::TASK_DEFINITION)?;

    let mut request = DeployRequest::new(workspace, task_definition)
        .with_cluster(ClusterName::or_default(inputs.get(inputs::CLUSTER)))
        .with_wait(WaitPolicy::from_inputs(
            inputs.get(inputs::WAIT_FOR_SERVICE_STABILITY),
            inputs.get(inputs::WAIT_FOR_MINUTES),
            inputs.get(inputs::FORCE_NEW_DEPLOYMENT),
        ))
        .with_codedeploy(CodeDeployOptions {
            appspec: inputs.get(inputs::CODEDEPLOY_APPSPEC).map(PathBuf::from),
            application: inputs.get(inputs::CODEDEPLOY_APPLICATION).map(String::from),
            deployment_group: inputs
                .get(inputs::CODEDEPLOY_DEPLOYMENT_GROUP)
                .map(String::from),
            description: inputs
                .get(inputs::CODEDEPLOY_DEPLOYMENT_DESCRIPTION)
                .map(String::from),
        });

    if let Some(service) = inputs.get(inputs::SERVICE) {
        request = request.with_service(ServiceName::new(service));
    }

    Ok(request)
}

/// Run using the current process arguments.
///
/// Returns `false` when a failure was reported.
pub async fn run() -> CliResult<bool> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<bool>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;
    let region = cli
        .region
        .clone()
        .or_else(|| config.region.clone())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let timeout = config
        .timeout_seconds
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);
    let poll_delay = config
        .poll_delay_seconds
        .map(Duration::from_secs)
        .unwrap_or(WAIT_DEFAULT_DELAY);

    let sink = Arc::new(ConsoleSink::from_env());

    let workspace = match cli.workspace.clone() {
        Some(workspace) => workspace,
        None => std::env::current_dir()?,
    };
    let request = match deploy_request(&cli.inputs(), workspace) {
        Ok(request) => request,
        Err(e) => {
            sink.set_failed(&e.to_string());
            return Ok(false);
        }
    };

    // Create clients
    let ecs = match cli.ecs_endpoint.clone().or_else(|| config.ecs_endpoint.clone()) {
        Some(endpoint) => EcsClient::new(&endpoint, timeout)?,
        None => EcsClient::for_region(&region, timeout)?,
    };
    let codedeploy = match cli
        .codedeploy_endpoint
        .clone()
        .or_else(|| config.codedeploy_endpoint.clone())
    {
        Some(endpoint) => CodeDeployClient::new(&endpoint, timeout)?,
        None => CodeDeployClient::for_region(&region, timeout)?,
    };
    debug!(
        ecs = %ecs.endpoint(),
        codedeploy = %codedeploy.endpoint(),
        "Using endpoints"
    );

    let mut orchestrator = Orchestrator::new(Arc::new(ecs), Arc::new(codedeploy), sink.clone())
        .with_region(region)
        .with_poll_delay(poll_delay);

    if orchestrator.run(&request).await.is_ok() && !sink.has_failed() {
        output::print_success("Deployment complete");
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(values: &[(&'static str, &str)]) -> Inputs {
        Inputs::resolve(
            values.iter().map(|(k, v)| (*k, Some(v.to_string()))),
            |_| None,
        )
    }

    #[test]
    fn test_request_from_minimal_inputs() {
        let request = deploy_request(
            &inputs(&[(inputs::TASK_DEFINITION, "task-definition.json")]),
            PathBuf::from("/work"),
        )
        .unwrap();

        assert_eq!(request.task_definition, PathBuf::from("task-definition.json"));
        assert_eq!(request.cluster.as_str(), "default");
        assert!(request.service.is_none());
        assert_eq!(request.wait, WaitPolicy::default());
    }

    #[test]
    fn test_request_from_all_inputs() {
        let request = deploy_request(
            &inputs(&[
                (inputs::TASK_DEFINITION, "td.json"),
                (inputs::SERVICE, "web"),
                (inputs::CLUSTER, "prod"),
                (inputs::WAIT_FOR_SERVICE_STABILITY, "TRUE"),
                (inputs::WAIT_FOR_MINUTES, "500"),
                (inputs::FORCE_NEW_DEPLOYMENT, "true"),
                (inputs::CODEDEPLOY_APPSPEC, "deploy/appspec.json"),
                (inputs::CODEDEPLOY_APPLICATION, "app"),
                (inputs::CODEDEPLOY_DEPLOYMENT_GROUP, "group"),
                (inputs::CODEDEPLOY_DEPLOYMENT_DESCRIPTION, "release"),
            ]),
            PathBuf::from("/work"),
        )
        .unwrap();

        assert_eq!(request.service.as_ref().map(|s| s.as_str()), Some("web"));
        assert_eq!(request.cluster.as_str(), "prod");
        assert!(request.wait.wait_for_service_stability);
        assert!(request.wait.force_new_deployment);
        assert_eq!(request.wait.wait_for_minutes, 360);
        assert_eq!(
            request.codedeploy.appspec,
            Some(PathBuf::from("deploy/appspec.json"))
        );
        assert_eq!(request.codedeploy.application.as_deref(), Some("app"));
        assert_eq!(request.codedeploy.deployment_group.as_deref(), Some("group"));
        assert_eq!(request.codedeploy.description.as_deref(), Some("release"));
    }

    #[test]
    fn test_missing_task_definition() {
        let err = deploy_request(&inputs(&[(inputs::SERVICE, "web")]), PathBuf::from("/work"))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_cli_flags_use_input_names() {
        let cli = Cli::parse_from([
            "ecs-deploy",
            "--task-definition",
            "td.json",
            "--wait-for-service-stability",
            "true",
            "--codedeploy-deployment-group",
            "group",
        ]);
        let inputs = cli.inputs();
        assert_eq!(inputs.get(inputs::TASK_DEFINITION), Some("td.json"));
        assert_eq!(inputs.get(inputs::WAIT_FOR_SERVICE_STABILITY), Some("true"));
        assert_eq!(inputs.get(inputs::CODEDEPLOY_DEPLOYMENT_GROUP), Some("group"));
    }
}
