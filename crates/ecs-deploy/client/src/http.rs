//! HTTP clients for the ECS and CodeDeploy JSON 1.1 protocols
//!
//! Both services take a `POST /` with the operation named in the
//! `X-Amz-Target` header and a JSON body. Requests are sent unsigned to the
//! configured endpoint.

use crate::api::{CodeDeployApi, EcsApi};
use crate::error::{ClientError, Result};
use crate::model::*;
use async_trait::async_trait;
use ecs_deploy_types::{ClusterName, DeploymentId, ServiceName};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Content type of the AWS JSON 1.1 protocol
pub const AWS_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

const TARGET_HEADER: &str = "X-Amz-Target";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Regional endpoint of an AWS service, e.g. `https://ecs.eu-west-1.amazonaws.com`
pub fn regional_endpoint(service: &str, region: &str) -> String {
    format!("https://{}.{}.amazonaws.com", service, region)
}

/// Low-level JSON 1.1 client bound to one service endpoint
#[derive(Debug, Clone)]
pub struct AwsJsonClient {
    client: Client,
    endpoint: String,
    target_prefix: &'static str,
}

/// Error body returned by the JSON 1.1 protocol
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

impl AwsJsonClient {
    pub fn new(endpoint: &str, target_prefix: &'static str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            target_prefix,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invoke `operation` with `body`
    pub async fn call<B, T>(&self, operation: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let target = format!("{}.{}", self.target_prefix, operation);
        debug!(target = %target, endpoint = %self.endpoint, "Sending request");

        let response = self
            .client
            .post(format!("{}/", self.endpoint))
            .header(CONTENT_TYPE, AWS_JSON_CONTENT_TYPE)
            .header(TARGET_HEADER, target)
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            if body.is_empty() {
                return Ok(serde_json::from_slice(b"{}")?);
            }
            return Ok(serde_json::from_slice(&body)?);
        }

        let text = String::from_utf8_lossy(&body).into_owned();
        match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(ErrorBody {
                error_type: Some(error_type),
                message,
            }) => {
                let code = error_type
                    .rsplit('#')
                    .next()
                    .unwrap_or(error_type.as_str())
                    .to_string();
                Err(ClientError::Service {
                    message: message.unwrap_or_else(|| code.clone()),
                    code,
                    status: status.as_u16(),
                })
            }
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message: text,
            }),
        }
    }
}

// ========== ECS ==========

/// ECS API over HTTP
#[derive(Debug, Clone)]
pub struct EcsClient {
    inner: AwsJsonClient,
}

impl EcsClient {
    pub const TARGET_PREFIX: &'static str = "AmazonEC2ContainerServiceV20141113";

    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: AwsJsonClient::new(endpoint, Self::TARGET_PREFIX, timeout)?,
        })
    }

    pub fn for_region(region: &str, timeout: Duration) -> Result<Self> {
        Self::new(&regional_endpoint("ecs", region), timeout)
    }

    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

#[async_trait]
impl EcsApi for EcsClient {
    async fn register_task_definition(
        &self,
        task_definition: &Value,
    ) -> Result<RegisterTaskDefinitionOutput> {
        self.inner
            .call("RegisterTaskDefinition", task_definition)
            .await
    }

    async fn describe_services(
        &self,
        cluster: &ClusterName,
        services: &[ServiceName],
    ) -> Result<DescribeServicesOutput> {
        let input = DescribeServicesInput {
            cluster: cluster.to_string(),
            services: services.iter().map(ToString::to_string).collect(),
        };
        self.inner.call("DescribeServices", &input).await
    }

    async fn update_service(&self, input: &UpdateServiceInput) -> Result<UpdateServiceOutput> {
        self.inner.call("UpdateService", input).await
    }
}

// ========== CodeDeploy ==========

/// CodeDeploy API over HTTP
#[derive(Debug, Clone)]
pub struct CodeDeployClient {
    inner: AwsJsonClient,
}

impl CodeDeployClient {
    pub const TARGET_PREFIX: &'static str = "CodeDeploy_20141006";

    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: AwsJsonClient::new(endpoint, Self::TARGET_PREFIX, timeout)?,
        })
    }

    pub fn for_region(region: &str, timeout: Duration) -> Result<Self> {
        Self::new(&regional_endpoint("codedeploy", region), timeout)
    }

    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}

#[async_trait]
impl CodeDeployApi for CodeDeployClient {
    async fn get_deployment_group(
        &self,
        application: &str,
        deployment_group: &str,
    ) -> Result<GetDeploymentGroupOutput> {
        let input = GetDeploymentGroupInput {
            application_name: application.to_string(),
            deployment_group_name: deployment_group.to_string(),
        };
        self.inner.call("GetDeploymentGroup", &input).await
    }

    async fn create_deployment(
        &self,
        input: &CreateDeploymentInput,
    ) -> Result<CreateDeploymentOutput> {
        self.inner.call("CreateDeployment", input).await
    }

    async fn get_deployment(&self, deployment_id: &DeploymentId) -> Result<GetDeploymentOutput> {
        let input = GetDeploymentInput {
            deployment_id: deployment_id.to_string(),
        };
        self.inner.call("GetDeployment", &input).await
    }
}
