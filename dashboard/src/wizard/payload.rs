// Typed submission payloads, one variant per wizard.
//
// The payload is assembled from the draft when the final step is submitted:
// required fields are checked, defaults fill the gaps, and the result is what
// the submission strategy receives.

use super::catalog::{self, WizardKind};
use super::error::WizardError;
use super::field::{Draft, FieldValue, FileRef};
use crate::api::notify::Notification;
use crate::utils::logging::mask_sensitive;
use crate::utils::validation::{
    extract_template_variables, parse_tags, required_message, validate_webhook_url,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperparameters {
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub dataset: Option<FileRef>,
    pub dataset_format: String,
    pub base_model: String,
    pub hyperparameters: Hyperparameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagPayload {
    pub embedding_model: Option<String>,
    pub dataset: Option<FileRef>,
    pub vector_database: Option<String>,
    pub wandb_api_key: Option<String>,
    pub wandb_project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    pub name: String,
    pub description: String,
    pub template: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentTarget {
    Api,
    Webhook,
    Export,
}

impl DeploymentTarget {
    fn from_id(id: &str) -> Self {
        match id {
            "webhook" => DeploymentTarget::Webhook,
            "export" => DeploymentTarget::Export,
            _ => DeploymentTarget::Api,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeploymentTarget::Api => "REST API",
            DeploymentTarget::Webhook => "webhook",
            DeploymentTarget::Export => "export",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPayload {
    pub name: String,
    pub model: String,
    pub target: DeploymentTarget,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub rate_limit: u32,
    pub auth: String,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPayload {
    pub name: String,
    pub base_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardPayload {
    FineTuningProject(ProjectPayload),
    RagPipeline(RagPayload),
    Prompt(PromptPayload),
    Deployment(DeploymentPayload),
    Model(ModelPayload),
}

/// Read-only view over a draft with typed accessors.
struct DraftReader<'a> {
    kind: WizardKind,
    draft: &'a Draft,
}

impl<'a> DraftReader<'a> {
    fn text(&self, name: &str) -> Option<String> {
        self.draft
            .get(name)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn text_or(&self, name: &str, fallback: &str) -> String {
        self.text(name).unwrap_or_else(|| fallback.to_string())
    }

    /// Number from the draft, else the declared default of the field.
    fn number(&self, name: &str) -> f64 {
        self.draft
            .get(name)
            .and_then(FieldValue::as_number)
            .or_else(|| {
                self.kind
                    .field(name)
                    .and_then(|f| f.kind.default_value())
                    .and_then(|v| v.as_number())
            })
            .unwrap_or(0.0)
    }

    fn file(&self, name: &str) -> Option<FileRef> {
        self.draft.get(name).and_then(FieldValue::as_file).cloned()
    }
}

fn check_required(kind: WizardKind, draft: &Draft) -> Result<(), WizardError> {
    let missing: Vec<_> = kind
        .fields()
        .iter()
        .filter(|f| f.required)
        .filter(|f| !draft.get(f.name).map(FieldValue::is_present).unwrap_or(false))
        .collect();

    match missing.first() {
        None => Ok(()),
        Some(first) => {
            let labels: Vec<&str> = missing.iter().map(|f| f.label).collect();
            Err(WizardError::validation(first.name, required_message(&labels)))
        }
    }
}

impl WizardPayload {
    /// Validate the draft and assemble the payload for `kind`.
    pub fn from_draft(kind: WizardKind, draft: &Draft) -> Result<Self, WizardError> {
        check_required(kind, draft)?;
        let r = DraftReader { kind, draft };

        let payload = match kind {
            WizardKind::FineTuningProject => WizardPayload::FineTuningProject(ProjectPayload {
                name: r.text_or("projectName", catalog::DEFAULT_PROJECT_NAME),
                description: r.text_or("projectDescription", ""),
                tags: parse_tags(&r.text_or("tags", "")),
                dataset: r.file("dataset"),
                dataset_format: r.text_or("datasetFormat", catalog::DATASET_FORMATS[0]),
                base_model: r.text_or("baseModel", catalog::BASE_MODELS[0]),
                hyperparameters: Hyperparameters {
                    epochs: r.number("epochs").round() as u32,
                    batch_size: r.number("batchSize").round() as u32,
                    learning_rate: r.number("learningRate"),
                },
            }),
            WizardKind::RagPipeline => WizardPayload::RagPipeline(RagPayload {
                embedding_model: r.text("embeddingModel"),
                dataset: r.file("dataset"),
                vector_database: r.text("vectorDatabase"),
                wandb_api_key: r.text("wandbApiKey"),
                wandb_project: r.text("wandbProject"),
            }),
            WizardKind::Prompt => {
                let template = r.text_or("promptTemplate", "");
                let variables = extract_template_variables(&template)
                    .map_err(|e| WizardError::validation("promptTemplate", e.to_string()))?;
                WizardPayload::Prompt(PromptPayload {
                    name: r.text_or("promptName", catalog::DEFAULT_PROMPT_NAME),
                    description: r.text_or("promptDescription", ""),
                    template,
                    variables,
                })
            }
            WizardKind::Deployment => {
                let target = DeploymentTarget::from_id(&r.text_or("deploymentType", "api"));
                let webhook_url = match target {
                    DeploymentTarget::Webhook => {
                        let url = validate_webhook_url(&r.text_or("webhookUrl", ""))
                            .map_err(|e| WizardError::validation("webhookUrl", e.to_string()))?;
                        Some(url.to_string())
                    }
                    _ => None,
                };
                WizardPayload::Deployment(DeploymentPayload {
                    name: r.text_or("deploymentName", ""),
                    model: r.text_or("model", ""),
                    target,
                    max_tokens: r.number("maxTokens").round() as u32,
                    timeout_ms: r.number("timeoutMs").round() as u64,
                    rate_limit: r.number("rateLimit").round() as u32,
                    auth: r.text_or("authType", catalog::AUTH_TYPES[0]),
                    webhook_url,
                })
            }
            WizardKind::Model => WizardPayload::Model(ModelPayload {
                name: r.text_or("modelName", ""),
                base_model: r.text_or("baseModel", ""),
            }),
        };
        Ok(payload)
    }

    pub fn kind(&self) -> WizardKind {
        match self {
            WizardPayload::FineTuningProject(_) => WizardKind::FineTuningProject,
            WizardPayload::RagPipeline(_) => WizardKind::RagPipeline,
            WizardPayload::Prompt(_) => WizardKind::Prompt,
            WizardPayload::Deployment(_) => WizardKind::Deployment,
            WizardPayload::Model(_) => WizardKind::Model,
        }
    }

    /// The toast shown once the submission completes.
    pub fn success_notification(&self) -> Notification {
        let title = self.kind().success_title();
        let description = match self {
            WizardPayload::FineTuningProject(p) => format!(
                "{} has been queued for fine-tuning on {} ({} epochs, batch size {}).",
                p.name, p.base_model, p.hyperparameters.epochs, p.hyperparameters.batch_size
            ),
            WizardPayload::RagPipeline(p) => format!(
                "Your RAG pipeline using {} is being deployed.",
                p.embedding_model
                    .as_deref()
                    .unwrap_or("the default embedding model")
            ),
            WizardPayload::Prompt(p) => format!("{} has been created successfully", p.name),
            WizardPayload::Deployment(p) => format!(
                "{} is deploying {} as a {}.",
                p.name,
                p.model,
                p.target.label()
            ),
            WizardPayload::Model(p) => {
                format!("{} is being built on {}.", p.name, p.base_model)
            }
        };
        Notification::new(title, description)
    }

    /// JSON for log lines. Secrets are masked.
    pub fn to_log_json(&self) -> String {
        let mut masked = self.clone();
        if let WizardPayload::RagPipeline(p) = &mut masked {
            p.wandb_api_key = p.wandb_api_key.as_deref().map(mask_sensitive);
        }
        serde_json::to_string(&masked).unwrap_or_else(|_| "{}".to_string())
    }
}
