//! Bounded polling
//!
//! Both post-submission waits (ECS service stability and CodeDeploy
//! deployment success) are the same loop: probe, classify, sleep. Only the
//! probe and its classification differ.

use ecs_deploy_client::model::{
    DeploymentInfo, DescribeServicesOutput, GetDeploymentOutput, Service, FAILURE_MISSING,
};
use ecs_deploy_types::WAIT_DEFAULT_DELAY;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Classification of one probe result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Complete,
    Pending,
    Failed(String),
}

/// Delay between probes and total bound of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub delay: Duration,
    pub max_wait: Duration,
}

impl PollConfig {
    pub fn new(delay: Duration, max_wait: Duration) -> Self {
        Self { delay, max_wait }
    }

    /// Number of probes before giving up, at least one
    pub fn max_attempts(&self) -> u64 {
        let delay = self.delay.as_millis();
        if delay == 0 {
            return 1;
        }
        let attempts = self.max_wait.as_millis() / delay;
        u64::try_from(attempts).unwrap_or(u64::MAX).max(1)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            delay: WAIT_DEFAULT_DELAY,
            max_wait: ecs_deploy_types::wait::minutes(ecs_deploy_types::DEFAULT_WAIT_MINUTES),
        }
    }
}

/// Wait errors
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("Timed out waiting for {operation} after {} seconds", waited.as_secs())]
    TimedOut { operation: String, waited: Duration },

    #[error("Waiting for {operation} failed: {reason}")]
    Failed { operation: String, reason: String },

    #[error("{message}")]
    Probe { operation: String, message: String },
}

/// Probe until the status is terminal or the attempts run out.
///
/// The first probe runs immediately; a delay separates consecutive probes.
pub async fn poll_until<F, Fut, E>(
    operation: &str,
    config: &PollConfig,
    mut probe: F,
) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus, E>>,
    E: fmt::Display,
{
    let attempts = config.max_attempts();

    for attempt in 1..=attempts {
        let status = probe().await.map_err(|e| WaitError::Probe {
            operation: operation.to_string(),
            message: e.to_string(),
        })?;

        match status {
            PollStatus::Complete => {
                debug!(operation, attempt, "Wait complete");
                return Ok(());
            }
            PollStatus::Failed(reason) => {
                return Err(WaitError::Failed {
                    operation: operation.to_string(),
                    reason,
                });
            }
            PollStatus::Pending => {
                debug!(operation, attempt, attempts, "Still waiting");
            }
        }

        if attempt < attempts {
            tokio::time::sleep(config.delay).await;
        }
    }

    Err(WaitError::TimedOut {
        operation: operation.to_string(),
        waited: config.max_wait,
    })
}

/// Classify a `DescribeServices` response for the services-stable wait.
///
/// A missing, draining or inactive service can never become stable. The
/// wait completes once every described service has a single deployment and
/// as many running tasks as desired.
pub fn services_stable(output: &DescribeServicesOutput) -> PollStatus {
    if let Some(failure) = output
        .failures
        .iter()
        .find(|f| f.reason.as_deref() == Some(FAILURE_MISSING))
    {
        return PollStatus::Failed(format!(
            "{} is {}",
            failure.arn.as_deref().unwrap_or_default(),
            FAILURE_MISSING
        ));
    }

    if let Some(service) = output.services.iter().find(|s| {
        matches!(
            s.status(),
            Service::STATUS_DRAINING | Service::STATUS_INACTIVE
        )
    }) {
        return PollStatus::Failed(format!(
            "Service {} is {}",
            service.service_name.as_deref().unwrap_or_default(),
            service.status()
        ));
    }

    let settled = output
        .services
        .iter()
        .all(|s| s.deployments.len() == 1 && s.running_count == s.desired_count);

    if settled {
        PollStatus::Complete
    } else {
        PollStatus::Pending
    }
}

/// Classify a `GetDeployment` response for the deployment-successful wait
pub fn deployment_successful(output: &GetDeploymentOutput) -> PollStatus {
    let Some(info) = &output.deployment_info else {
        return PollStatus::Pending;
    };

    match info.status() {
        DeploymentInfo::STATUS_SUCCEEDED => PollStatus::Complete,
        status @ (DeploymentInfo::STATUS_FAILED | DeploymentInfo::STATUS_STOPPED) => {
            let id = info.deployment_id.as_deref().unwrap_or_default();
            let detail = info
                .error_information
                .as_ref()
                .and_then(|e| e.message.as_deref());
            PollStatus::Failed(match detail {
                Some(detail) => format!("Deployment {} is {}: {}", id, status, detail),
                None => format!("Deployment {} is {}", id, status),
            })
        }
        _ => PollStatus::Pending,
    }
}
