//! Post-update wait policy

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound for both wait kinds, in minutes
pub const DEFAULT_WAIT_MINUTES: u32 = 30;

/// Largest wait the provider waiters accept (6 hours)
pub const MAX_WAIT_MINUTES: u32 = 360;

/// Delay between two polls of a provider waiter
pub const WAIT_DEFAULT_DELAY: Duration = Duration::from_secs(15);

/// Governs what happens after the service update or deployment is submitted.
///
/// Registration is never affected by this policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Poll until the service (or CodeDeploy deployment) is stable
    pub wait_for_service_stability: bool,

    /// Wait bound in minutes, at most [`MAX_WAIT_MINUTES`]
    pub wait_for_minutes: u32,

    /// Force ECS to start a new deployment even if nothing changed
    pub force_new_deployment: bool,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            wait_for_service_stability: false,
            wait_for_minutes: DEFAULT_WAIT_MINUTES,
            force_new_deployment: false,
        }
    }
}

impl WaitPolicy {
    /// Build a policy from raw named-input strings.
    ///
    /// Booleans are true only for a case-insensitive `true`. Minutes fall
    /// back to the default when missing, unparsable or zero, and are capped
    /// at [`MAX_WAIT_MINUTES`].
    pub fn from_inputs(
        wait_for_service_stability: Option<&str>,
        wait_for_minutes: Option<&str>,
        force_new_deployment: Option<&str>,
    ) -> Self {
        Self {
            wait_for_service_stability: parse_flag(wait_for_service_stability),
            wait_for_minutes: parse_minutes(wait_for_minutes),
            force_new_deployment: parse_flag(force_new_deployment),
        }
    }

    /// Wait bound as a duration
    pub fn max_wait(&self) -> Duration {
        minutes(self.wait_for_minutes)
    }
}

/// Clamp a wait bound to `1..=MAX_WAIT_MINUTES`, zero meaning the default
pub fn clamp_minutes(minutes: u32) -> u32 {
    match minutes {
        0 => DEFAULT_WAIT_MINUTES,
        m => m.min(MAX_WAIT_MINUTES),
    }
}

/// Minutes as a [`Duration`]
pub fn minutes(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn parse_minutes(raw: Option<&str>) -> u32 {
    // Leading digits only, like a lenient integer parse of "45min"
    let digits: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return DEFAULT_WAIT_MINUTES;
    }
    match digits.parse::<u32>() {
        Ok(m) => clamp_minutes(m),
        // Only overflow is left once the digits are non-empty
        Err(_) => MAX_WAIT_MINUTES,
    }
}
