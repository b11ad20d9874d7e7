// Terminal submission seam for wizards.
//
// The dashboard ships only the simulated strategy (fixed delay, always Ok).
// Real integrations plug in through `SubmissionStrategy` and may fail.

use crate::wizard::payload::WizardPayload;
use async_trait::async_trait;
use log::info;
use std::time::Duration;

/// Error returned by a submission strategy.
/// Keeps user-friendly messages separate from internal details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    /// User-friendly message (safe to show in a toast)
    pub user_message: String,
    /// Internal details for logging
    pub internal_details: String,
}

impl SubmitError {
    pub fn new(user_message: impl Into<String>, internal_details: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            internal_details: internal_details.into(),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message)
    }
}

impl std::error::Error for SubmitError {}

#[async_trait]
pub trait SubmissionStrategy: Send + Sync {
    async fn submit(&self, correlation_id: &str, payload: &WizardPayload)
        -> Result<(), SubmitError>;
}

/// Stand-in for every backend call: logs the payload, waits, succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl SubmissionStrategy for SimulatedSubmitter {
    async fn submit(
        &self,
        correlation_id: &str,
        payload: &WizardPayload,
    ) -> Result<(), SubmitError> {
        info!(
            "[PHASE: wizard] [STEP: submit] correlation_id={} kind={} payload={}",
            correlation_id,
            payload.kind().id(),
            payload.to_log_json()
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::payload::PromptPayload;
    use tokio::time::Instant;

    fn prompt() -> WizardPayload {
        WizardPayload::Prompt(PromptPayload {
            name: "Helper".to_string(),
            description: String::new(),
            template: "Hi {{name}}".to_string(),
            variables: vec!["name".to_string()],
        })
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_submit_waits_configured_delay() {
        let submitter = SimulatedSubmitter::default();
        let started = Instant::now();

        let result = submitter.submit("cid-1", &prompt()).await;

        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let submitter = SimulatedSubmitter::new(Duration::ZERO);
        assert!(submitter.submit("cid-2", &prompt()).await.is_ok());
    }

    #[test]
    fn submit_error_displays_user_message_only() {
        let err = SubmitError::new("Could not reach the training service.", "HTTP 503");
        assert_eq!(err.to_string(), "Could not reach the training service.");
    }
}
