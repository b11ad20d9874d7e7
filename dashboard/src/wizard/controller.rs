// Linear multi-step wizard controller.
//
// Owns the step index, the draft and the submission flag of one open wizard.
// The host renders whatever `state()` says and forwards field edits and button
// presses here. Observers are called after every mutation.

use super::catalog::WizardKind;
use super::error::WizardError;
use super::field::{describe_mismatch, Draft, FieldKind, FieldValue};
use super::payload::WizardPayload;
use crate::api::notify::{Notification, NotificationSink};
use crate::api::submission::{SubmissionStrategy, SubmitError};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    /// 1-based, always within `1..=total_steps`.
    pub step_index: usize,
    pub total_steps: usize,
    pub draft: Draft,
    pub is_submitting: bool,
}

impl WizardState {
    fn initial(total_steps: usize) -> Self {
        Self {
            step_index: 1,
            total_steps,
            draft: Draft::new(),
            is_submitting: false,
        }
    }

    pub fn is_final_step(&self) -> bool {
        self.step_index == self.total_steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Step(usize),
    Submitting,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    FieldChanged { name: String },
    StepChanged { from: usize, to: usize },
    SubmitStarted { correlation_id: String },
    SubmitFailed { message: String },
    Completed { correlation_id: String },
    Cancelled,
}

pub type WizardObserver = Box<dyn Fn(&WizardEvent, &WizardState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome of a non-submitting forward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepForward {
    Moved(usize),
    /// Already on the final step; the host should start the submission.
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Moved(usize),
    Submitted(SubmitReceipt),
}

/// A validated payload waiting for the strategy. Produced by `begin_submit`,
/// consumed by `finish_submit`.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub correlation_id: String,
    pub payload: WizardPayload,
    started: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub correlation_id: String,
    pub payload: WizardPayload,
    pub elapsed_ms: u64,
}

pub struct WizardController {
    kind: WizardKind,
    state: WizardState,
    closed: bool,
    in_flight: Option<String>,
    submitter: Arc<dyn SubmissionStrategy>,
    sink: Arc<dyn NotificationSink>,
    observers: Vec<(SubscriptionId, WizardObserver)>,
    next_subscription: u64,
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("closed", &self.closed)
            .field("in_flight", &self.in_flight)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl WizardController {
    pub fn new(
        kind: WizardKind,
        submitter: Arc<dyn SubmissionStrategy>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        info!(
            "[PHASE: wizard] [STEP: open] kind={} steps={}",
            kind.id(),
            kind.total_steps()
        );
        Self {
            kind,
            state: WizardState::initial(kind.total_steps()),
            closed: false,
            in_flight: None,
            submitter,
            sink,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn kind(&self) -> WizardKind {
        self.kind
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.state.draft
    }

    pub fn phase(&self) -> WizardPhase {
        if self.closed {
            WizardPhase::Closed
        } else if self.state.is_submitting {
            WizardPhase::Submitting
        } else {
            WizardPhase::Step(self.state.step_index)
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn step_title(&self) -> &'static str {
        self.kind.step_title(self.state.step_index)
    }

    /// Label of the primary button for the current step.
    pub fn primary_label(&self) -> &'static str {
        if self.state.is_final_step() {
            self.kind.final_label()
        } else {
            "Next"
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.closed && !self.state.is_submitting && self.state.step_index > 1
    }

    pub fn subscribe(&mut self, observer: WizardObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn emit(&self, event: WizardEvent) {
        for (_, observer) in &self.observers {
            observer(&event, &self.state);
        }
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.closed {
            return Err(WizardError::Closed);
        }
        if self.state.is_submitting {
            return Err(WizardError::SubmitInProgress);
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.state.draft.get(name.trim())
    }

    /// Store a value for any field the wizard declares, whatever the current step.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), WizardError> {
        self.ensure_editable()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(WizardError::EmptyFieldName);
        }
        let spec = self
            .kind
            .field(name)
            .ok_or_else(|| WizardError::UnknownField(name.to_string()))?;

        if !spec.kind.accepts(&value) {
            return Err(WizardError::TypeMismatch(describe_mismatch(spec, &value)));
        }

        match (&spec.kind, &value) {
            (FieldKind::Number { min, max, .. }, FieldValue::Number(n)) => {
                if n.is_nan() || *n < *min || *n > *max {
                    return Err(WizardError::TypeMismatch(format!(
                        "field '{}' must be between {} and {}",
                        spec.name, min, max
                    )));
                }
            }
            (FieldKind::Choice { options }, FieldValue::Text(s)) => {
                let s = s.trim();
                if !s.is_empty() && !options.contains(&s) {
                    return Err(WizardError::TypeMismatch(format!(
                        "field '{}' must be one of: {}",
                        spec.name,
                        options.join(", ")
                    )));
                }
            }
            _ => {}
        }

        self.state.draft.insert(spec.name.to_string(), value);
        self.emit(WizardEvent::FieldChanged {
            name: spec.name.to_string(),
        });
        Ok(())
    }

    /// Remove a value so the field falls back to its default.
    pub fn clear_field(&mut self, name: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let name = name.trim();
        if self.state.draft.remove(name).is_some() {
            self.emit(WizardEvent::FieldChanged {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Move one step forward, or report that the final step has been reached.
    /// No per-step validation.
    pub fn step_forward(&mut self) -> Result<StepForward, WizardError> {
        self.ensure_editable()?;
        if self.state.is_final_step() {
            return Ok(StepForward::Submit);
        }

        let from = self.state.step_index;
        self.state.step_index += 1;
        info!(
            "[PHASE: wizard] [STEP: advance] kind={} step {}/{}",
            self.kind.id(),
            self.state.step_index,
            self.state.total_steps
        );
        self.emit(WizardEvent::StepChanged {
            from,
            to: self.state.step_index,
        });
        Ok(StepForward::Moved(self.state.step_index))
    }

    /// Next step, or submission when already on the final step.
    pub async fn advance(&mut self) -> Result<Transition, WizardError> {
        match self.step_forward()? {
            StepForward::Moved(step) => Ok(Transition::Moved(step)),
            StepForward::Submit => self.submit().await.map(Transition::Submitted),
        }
    }

    /// Previous step. No-op on step 1, while submitting, or once closed.
    pub fn retreat(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        let from = self.state.step_index;
        self.state.step_index -= 1;
        info!(
            "[PHASE: wizard] [STEP: retreat] kind={} step {}/{}",
            self.kind.id(),
            self.state.step_index,
            self.state.total_steps
        );
        self.emit(WizardEvent::StepChanged {
            from,
            to: self.state.step_index,
        });
        true
    }

    /// Validate the draft and enter `Submitting`.
    ///
    /// A missing required field produces one destructive notification and
    /// leaves the state untouched.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, WizardError> {
        self.ensure_editable()?;
        if !self.state.is_final_step() {
            return Err(WizardError::NotOnFinalStep);
        }

        let payload = match WizardPayload::from_draft(self.kind, &self.state.draft) {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    "[PHASE: wizard] [STEP: validate] kind={} rejected: {}",
                    self.kind.id(),
                    e
                );
                self.sink
                    .notify(Notification::destructive("Validation Error", e.to_string()));
                return Err(e);
            }
        };

        let correlation_id = uuid::Uuid::new_v4().to_string();
        self.state.is_submitting = true;
        self.in_flight = Some(correlation_id.clone());
        info!(
            "[PHASE: wizard] [STEP: submit_start] kind={} correlation_id={}",
            self.kind.id(),
            correlation_id
        );
        self.emit(WizardEvent::SubmitStarted {
            correlation_id: correlation_id.clone(),
        });

        Ok(PendingSubmission {
            correlation_id,
            payload,
            started: Instant::now(),
        })
    }

    /// Apply the strategy's outcome.
    ///
    /// Success: one notification, state reset, wizard closed.
    /// Failure: one destructive notification, back on the final step with the draft intact.
    /// A result arriving after `cancel` is dropped silently, and so is one
    /// for any submission other than the one currently in flight.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<(), SubmitError>,
    ) -> Result<SubmitReceipt, WizardError> {
        if self.closed || !self.state.is_submitting {
            info!(
                "[PHASE: wizard] [STEP: submit_drop] correlation_id={} arrived after dismissal",
                pending.correlation_id
            );
            return Err(WizardError::Closed);
        }
        if self.in_flight.as_deref() != Some(pending.correlation_id.as_str()) {
            info!(
                "[PHASE: wizard] [STEP: submit_drop] correlation_id={} is stale (in flight: {:?})",
                pending.correlation_id,
                self.in_flight
            );
            return Err(WizardError::StaleSubmission(pending.correlation_id));
        }
        self.in_flight = None;

        let elapsed_ms = pending.started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                self.sink.notify(pending.payload.success_notification());
                self.state = WizardState::initial(self.kind.total_steps());
                self.closed = true;
                info!(
                    "[PHASE: wizard] [STEP: submit_done] kind={} correlation_id={} elapsed_ms={}",
                    self.kind.id(),
                    pending.correlation_id,
                    elapsed_ms
                );
                self.emit(WizardEvent::Completed {
                    correlation_id: pending.correlation_id.clone(),
                });
                Ok(SubmitReceipt {
                    correlation_id: pending.correlation_id,
                    payload: pending.payload,
                    elapsed_ms,
                })
            }
            Err(e) => {
                self.state.is_submitting = false;
                warn!(
                    "[PHASE: wizard] [STEP: submit_failed] kind={} correlation_id={} details={}",
                    self.kind.id(),
                    pending.correlation_id,
                    e.internal_details
                );
                self.sink
                    .notify(Notification::destructive("Submission Failed", &e.user_message));
                self.emit(WizardEvent::SubmitFailed {
                    message: e.user_message.clone(),
                });
                Err(WizardError::Submit(e))
            }
        }
    }

    /// Validate, run the strategy, apply the outcome.
    pub async fn submit(&mut self) -> Result<SubmitReceipt, WizardError> {
        let pending = self.begin_submit()?;
        let submitter = Arc::clone(&self.submitter);
        let result = submitter
            .submit(&pending.correlation_id, &pending.payload)
            .await;
        self.finish_submit(pending, result)
    }

    /// Strategy handle for hosts that run the submission themselves.
    pub fn submitter(&self) -> Arc<dyn SubmissionStrategy> {
        Arc::clone(&self.submitter)
    }

    /// Discard everything and close. Never notifies.
    pub fn cancel(&mut self) {
        if self.closed {
            return;
        }
        info!(
            "[PHASE: wizard] [STEP: cancel] kind={} at step {}/{} (submitting={})",
            self.kind.id(),
            self.state.step_index,
            self.state.total_steps,
            self.state.is_submitting
        );
        self.state = WizardState::initial(self.kind.total_steps());
        self.closed = true;
        self.in_flight = None;
        self.emit(WizardEvent::Cancelled);
    }
}
