//! Deployment run parameters

use ecs_deploy_appspec::DEFAULT_APPSPEC_PATH;
use ecs_deploy_types::{ClusterName, ServiceName, WaitPolicy};
use std::path::{Path, PathBuf};

/// Everything a single run needs to know
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// Base directory for relative file paths
    pub workspace: PathBuf,
    /// Task definition file, absolute or relative to the workspace
    pub task_definition: PathBuf,
    /// Target service; `None` registers the task definition only
    pub service: Option<ServiceName>,
    pub cluster: ClusterName,
    pub wait: WaitPolicy,
    pub codedeploy: CodeDeployOptions,
}

impl DeployRequest {
    pub fn new(workspace: impl Into<PathBuf>, task_definition: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            task_definition: task_definition.into(),
            service: None,
            cluster: ClusterName::default(),
            wait: WaitPolicy::default(),
            codedeploy: CodeDeployOptions::default(),
        }
    }

    pub fn with_service(mut self, service: ServiceName) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_cluster(mut self, cluster: ClusterName) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_codedeploy(mut self, codedeploy: CodeDeployOptions) -> Self {
        self.codedeploy = codedeploy;
        self
    }
}

/// Settings for the CodeDeploy blue/green handoff
#[derive(Debug, Clone, Default)]
pub struct CodeDeployOptions {
    /// AppSpec file; defaults to `appspec.yaml`
    pub appspec: Option<PathBuf>,
    /// Application name; defaults to `AppECS-{cluster}-{service}`
    pub application: Option<String>,
    /// Deployment group name; defaults to `DgpECS-{cluster}-{service}`
    pub deployment_group: Option<String>,
    pub description: Option<String>,
}

impl CodeDeployOptions {
    pub fn appspec_path(&self) -> &Path {
        self.appspec
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_APPSPEC_PATH))
    }

    pub fn application_name(&self, cluster: &ClusterName, service: &ServiceName) -> String {
        self.application
            .clone()
            .unwrap_or_else(|| format!("AppECS-{}-{}", cluster, service))
    }

    pub fn deployment_group_name(&self, cluster: &ClusterName, service: &ServiceName) -> String {
        self.deployment_group
            .clone()
            .unwrap_or_else(|| format!("DgpECS-{}-{}", cluster, service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codedeploy_defaults() {
        let options = CodeDeployOptions::default();
        let cluster = ClusterName::default();
        let service = ServiceName::new("web");

        assert_eq!(options.appspec_path(), Path::new("appspec.yaml"));
        assert_eq!(options.application_name(&cluster, &service), "AppECS-default-web");
        assert_eq!(
            options.deployment_group_name(&cluster, &service),
            "DgpECS-default-web"
        );
    }

    #[test]
    fn test_codedeploy_overrides() {
        let options = CodeDeployOptions {
            appspec: Some(PathBuf::from("deploy/appspec.json")),
            application: Some("my-app".into()),
            deployment_group: Some("my-group".into()),
            description: Some("release 42".into()),
        };
        let cluster = ClusterName::new("prod");
        let service = ServiceName::new("web");

        assert_eq!(options.appspec_path(), Path::new("deploy/appspec.json"));
        assert_eq!(options.application_name(&cluster, &service), "my-app");
        assert_eq!(options.deployment_group_name(&cluster, &service), "my-group");
    }

    #[test]
    fn test_request_defaults() {
        let request = DeployRequest::new("/work", "task-definition.json");
        assert!(request.service.is_none());
        assert_eq!(request.cluster.as_str(), "default");
        assert!(!request.wait.wait_for_service_stability);
    }
}
