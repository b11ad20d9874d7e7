// Headless wizard smoke run: drives every wizard through a successful
// submission and a mid-flow cancel, and returns the event transcript.

use crate::api::notify::{LogSink, Notification, NotificationSink, ToastQueue};
use crate::api::submission::SimulatedSubmitter;
use crate::wizard::catalog::DEPLOYABLE_MODELS;
use crate::wizard::{FieldValue, WizardController, WizardEvent, WizardKind, WizardState};
use anyhow::{bail, Result};
use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Minimal draft that passes submit-time validation.
fn seed(kind: WizardKind) -> Vec<(&'static str, FieldValue)> {
    match kind {
        WizardKind::FineTuningProject => vec![
            ("projectName", FieldValue::text("Smoke Project")),
            ("tags", FieldValue::text("smoke, ci")),
        ],
        WizardKind::RagPipeline => vec![
            ("vectorDatabase", FieldValue::text("embedded")),
            ("wandbApiKey", FieldValue::text("wandb-smoke-key")),
        ],
        WizardKind::Prompt => vec![
            ("promptName", FieldValue::text("Smoke Prompt")),
            ("promptTemplate", FieldValue::text("Hello {{name}}")),
        ],
        WizardKind::Deployment => vec![
            ("deploymentName", FieldValue::text("Smoke API")),
            ("model", FieldValue::text(DEPLOYABLE_MODELS[0])),
        ],
        WizardKind::Model => vec![
            ("modelName", FieldValue::text("Smoke Model")),
            ("baseModel", FieldValue::text("gpt-4o-mini")),
        ],
    }
}

fn controller(
    kind: WizardKind,
    sink: Arc<dyn NotificationSink>,
    transcript: &Arc<Mutex<Vec<String>>>,
) -> WizardController {
    let mut wizard = WizardController::new(
        kind,
        Arc::new(SimulatedSubmitter::new(Duration::ZERO)),
        sink,
    );
    let lines = Arc::clone(transcript);
    wizard.subscribe(Box::new(move |event: &WizardEvent, state: &WizardState| {
        if let Ok(mut lines) = lines.lock() {
            lines.push(format!(
                "{} step {}/{}: {:?}",
                kind.id(),
                state.step_index,
                state.total_steps,
                event
            ));
        }
    }));
    wizard
}

pub async fn wizard_transcript() -> Result<Vec<String>> {
    let transcript = Arc::new(Mutex::new(Vec::new()));
    let toasts = Arc::new(ToastQueue::new(Duration::from_secs(60)).with_capacity(64));

    for kind in WizardKind::ALL {
        // Happy path.
        let mut wizard = controller(kind, toasts.clone(), &transcript);
        for (name, value) in seed(kind) {
            wizard.set_field(name, value)?;
        }
        while !wizard.is_closed() {
            wizard.advance().await?;
        }
        let last = toasts.snapshot().pop();
        match last {
            Some(n) if !n.is_destructive() && n.title == kind.success_title() => {
                info!("[PHASE: smoke] [STEP: {}] {}: {}", kind.id(), n.title, n.description);
            }
            other => bail!("{} finished without a success notification: {:?}", kind.id(), other),
        }

        // Cancel mid-way never notifies.
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&sent);
        let sink: Arc<dyn NotificationSink> = Arc::new(move |n: Notification| {
            counter.fetch_add(1, Ordering::SeqCst);
            LogSink.notify(n);
        });
        let mut wizard = controller(kind, sink, &transcript);
        if kind.total_steps() > 1 {
            wizard.step_forward()?;
        }
        wizard.cancel();
        if sent.load(Ordering::SeqCst) != 0 {
            bail!("{} notified on cancel", kind.id());
        }
    }

    let lines = transcript
        .lock()
        .map(|l| l.clone())
        .map_err(|_| anyhow::anyhow!("transcript lock poisoned"))?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_wizard_completes_and_cancels_cleanly() {
        let lines = wizard_transcript().await.unwrap();
        for kind in WizardKind::ALL {
            let prefix = format!("{} ", kind.id());
            assert!(lines.iter().any(|l| l.starts_with(&prefix) && l.contains("Completed")));
            assert!(lines.iter().any(|l| l.starts_with(&prefix) && l.contains("Cancelled")));
        }
    }
}
