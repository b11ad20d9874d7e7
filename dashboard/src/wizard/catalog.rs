// Wizard catalogue: the five creation flows of the dashboard, their step
// titles and their declared fields.

use super::field::{FieldKind, FieldSpec};
use serde::{Deserialize, Serialize};

pub const BASE_MODELS: &[&str] = &["Llama-3.3-70B", "GPT-4o", "Qwen2.5-Coder-7B", "DeepSeek-V3"];
pub const DATASET_FORMATS: &[&str] = &["CSV", "JSONL"];
pub const EMBEDDING_MODELS: &[&str] = &["DeepSeek-V3-0324", "FineTunAI model 2"];
pub const DEPLOYABLE_MODELS: &[&str] =
    &["Llama-3.3-70B-Instruct", "GPT-4o Custom", "Qwen2.5-Coder-7B"];
pub const DEPLOYMENT_TARGETS: &[&str] = &["api", "webhook", "export"];
pub const AUTH_TYPES: &[&str] = &["api-key", "oauth", "jwt"];

pub const DEFAULT_PROJECT_NAME: &str = "My Fine-Tuning Project";
pub const DEFAULT_PROMPT_NAME: &str = "Untitled Prompt";

pub const EPOCHS: FieldKind = FieldKind::Number {
    min: 1.0,
    max: 10.0,
    step: 1.0,
    default: 3.0,
};
pub const BATCH_SIZE: FieldKind = FieldKind::Number {
    min: 8.0,
    max: 128.0,
    step: 8.0,
    default: 32.0,
};
pub const LEARNING_RATE: FieldKind = FieldKind::Number {
    min: 0.00001,
    max: 0.001,
    step: 0.00001,
    default: 0.0001,
};
pub const MAX_TOKENS: FieldKind = FieldKind::Number {
    min: 1.0,
    max: 32768.0,
    step: 1.0,
    default: 1024.0,
};
pub const TIMEOUT_MS: FieldKind = FieldKind::Number {
    min: 1000.0,
    max: 600000.0,
    step: 1000.0,
    default: 30000.0,
};
pub const RATE_LIMIT: FieldKind = FieldKind::Number {
    min: 1.0,
    max: 10000.0,
    step: 1.0,
    default: 100.0,
};

const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("projectName", "Project Name", 1, FieldKind::Text, DEFAULT_PROJECT_NAME),
    FieldSpec::optional(
        "projectDescription",
        "Description (Optional)",
        1,
        FieldKind::Text,
        "What are you trying to achieve with this fine-tuning?",
    ),
    FieldSpec::optional(
        "tags",
        "Tags (Optional)",
        1,
        FieldKind::Text,
        "Add tags separated by commas",
    ),
    FieldSpec::optional("dataset", "Dataset File", 2, FieldKind::File, "CSV or JSON file path"),
    FieldSpec::optional(
        "datasetFormat",
        "Dataset Format",
        2,
        FieldKind::Choice {
            options: DATASET_FORMATS,
        },
        "",
    ),
    FieldSpec::optional(
        "baseModel",
        "Select Base Model",
        3,
        FieldKind::Choice {
            options: BASE_MODELS,
        },
        "",
    ),
    FieldSpec::optional("epochs", "Epochs", 4, EPOCHS, ""),
    FieldSpec::optional("batchSize", "Batch Size", 4, BATCH_SIZE, ""),
    FieldSpec::optional("learningRate", "Learning Rate", 4, LEARNING_RATE, ""),
];

const RAG_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional(
        "embeddingModel",
        "Select model",
        1,
        FieldKind::Choice {
            options: EMBEDDING_MODELS,
        },
        "Choose your desired model here",
    ),
    FieldSpec::optional(
        "dataset",
        "Dataset",
        2,
        FieldKind::File,
        "Upload your training dataset (.json)",
    ),
    FieldSpec::optional(
        "vectorDatabase",
        "Database type",
        3,
        FieldKind::Text,
        "select embedded database or paste custom url",
    ),
    FieldSpec::optional(
        "wandbApiKey",
        "W&B API key",
        4,
        FieldKind::Secret,
        "Enter your Weights & Biases API key",
    ),
    FieldSpec::optional(
        "wandbProject",
        "W&B project",
        4,
        FieldKind::Text,
        "Enter your Weights & Biases project name",
    ),
];

const PROMPT_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional(
        "promptName",
        "Prompt Name",
        1,
        FieldKind::Text,
        "E.g., Customer Support Helper",
    ),
    FieldSpec::optional(
        "promptDescription",
        "Description",
        1,
        FieldKind::Text,
        "Describe what this prompt does...",
    ),
    FieldSpec::optional(
        "promptTemplate",
        "Prompt Template",
        2,
        FieldKind::Text,
        "Use {{variableName}} for dynamic content.",
    ),
];

const DEPLOYMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "deploymentName",
        "Deployment Name",
        1,
        FieldKind::Text,
        "E.g., Customer Support API",
    ),
    FieldSpec::required(
        "model",
        "Select Model",
        1,
        FieldKind::Choice {
            options: DEPLOYABLE_MODELS,
        },
        "Select a model...",
    ),
    FieldSpec::optional(
        "deploymentType",
        "Deployment Type",
        1,
        FieldKind::Choice {
            options: DEPLOYMENT_TARGETS,
        },
        "",
    ),
    FieldSpec::optional("maxTokens", "Max Tokens", 1, MAX_TOKENS, ""),
    FieldSpec::optional("timeoutMs", "Timeout (ms)", 1, TIMEOUT_MS, ""),
    FieldSpec::optional("rateLimit", "Rate Limit", 1, RATE_LIMIT, ""),
    FieldSpec::optional(
        "authType",
        "Authentication",
        1,
        FieldKind::Choice {
            options: AUTH_TYPES,
        },
        "",
    ),
    FieldSpec::optional(
        "webhookUrl",
        "Webhook URL",
        1,
        FieldKind::Text,
        "https://...",
    ),
];

const MODEL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("modelName", "Model Name", 1, FieldKind::Text, "My Custom Model"),
    FieldSpec::required(
        "baseModel",
        "Base Model",
        1,
        FieldKind::Text,
        "e.g., gpt-4o-mini",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardKind {
    FineTuningProject,
    RagPipeline,
    Prompt,
    Deployment,
    Model,
}

impl WizardKind {
    pub const ALL: [WizardKind; 5] = [
        WizardKind::FineTuningProject,
        WizardKind::RagPipeline,
        WizardKind::Prompt,
        WizardKind::Deployment,
        WizardKind::Model,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            WizardKind::FineTuningProject => "project",
            WizardKind::RagPipeline => "rag",
            WizardKind::Prompt => "prompt",
            WizardKind::Deployment => "deployment",
            WizardKind::Model => "model",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardKind::FineTuningProject => "Create Fine-Tuning Project",
            WizardKind::RagPipeline => "Auto RAG",
            WizardKind::Prompt => "Create New Prompt",
            WizardKind::Deployment => "Create New Deployment",
            WizardKind::Model => "Create New Model",
        }
    }

    pub fn step_titles(&self) -> &'static [&'static str] {
        match self {
            WizardKind::FineTuningProject => &[
                "Project Setup",
                "Dataset Upload",
                "Model Selection",
                "Hyperparameters",
                "Launch",
            ],
            WizardKind::RagPipeline => &[
                "Embedded model",
                "Datasets",
                "Embedded Vector database",
                "Integrations",
            ],
            WizardKind::Prompt => &["Details", "Template", "Review"],
            WizardKind::Deployment => &["Configure"],
            WizardKind::Model => &["Configure"],
        }
    }

    pub fn total_steps(&self) -> usize {
        self.step_titles().len()
    }

    /// Title of a 1-based step; empty for out-of-range indices.
    pub fn step_title(&self, step: usize) -> &'static str {
        step.checked_sub(1)
            .and_then(|i| self.step_titles().get(i))
            .copied()
            .unwrap_or("")
    }

    /// Label of the primary button on the last step.
    pub fn final_label(&self) -> &'static str {
        match self {
            WizardKind::FineTuningProject => "Start Training",
            WizardKind::RagPipeline => "Deploy",
            WizardKind::Prompt => "Create Prompt",
            WizardKind::Deployment => "Deploy API",
            WizardKind::Model => "Create Model",
        }
    }

    pub fn success_title(&self) -> &'static str {
        match self {
            WizardKind::FineTuningProject => "Fine-Tuning Project Created",
            WizardKind::RagPipeline => "RAG Pipeline Created",
            WizardKind::Prompt => "Prompt Created",
            WizardKind::Deployment => "Deployment Created",
            WizardKind::Model => "Model Created",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            WizardKind::FineTuningProject => PROJECT_FIELDS,
            WizardKind::RagPipeline => RAG_FIELDS,
            WizardKind::Prompt => PROMPT_FIELDS,
            WizardKind::Deployment => DEPLOYMENT_FIELDS,
            WizardKind::Model => MODEL_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn fields_for_step(&self, step: usize) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(move |f| f.step == step)
    }

    /// The last step echoes the draft back instead of collecting fields.
    pub fn has_review_step(&self) -> bool {
        let last = self.total_steps();
        self.total_steps() > 1 && self.fields_for_step(last).next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counts_match_the_dashboard_flows() {
        assert_eq!(WizardKind::FineTuningProject.total_steps(), 5);
        assert_eq!(WizardKind::RagPipeline.total_steps(), 4);
        assert_eq!(WizardKind::Prompt.total_steps(), 3);
        assert_eq!(WizardKind::Deployment.total_steps(), 1);
        assert_eq!(WizardKind::Model.total_steps(), 1);
    }

    #[test]
    fn every_field_sits_on_a_real_step() {
        for kind in WizardKind::ALL {
            for field in kind.fields() {
                assert!(
                    (1..=kind.total_steps()).contains(&field.step),
                    "{}::{} is on step {}",
                    kind.id(),
                    field.name,
                    field.step
                );
            }
        }
    }

    #[test]
    fn field_names_are_unique_per_wizard() {
        for kind in WizardKind::ALL {
            let mut names: Vec<&str> = kind.fields().iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), kind.fields().len(), "{}", kind.id());
        }
    }

    #[test]
    fn parse_round_trips_ids() {
        for kind in WizardKind::ALL {
            assert_eq!(WizardKind::parse(kind.id()), Some(kind));
        }
        assert_eq!(WizardKind::parse(" RAG "), Some(WizardKind::RagPipeline));
        assert_eq!(WizardKind::parse("training"), None);
    }

    #[test]
    fn step_title_is_one_based() {
        let kind = WizardKind::FineTuningProject;
        assert_eq!(kind.step_title(1), "Project Setup");
        assert_eq!(kind.step_title(5), "Launch");
        assert_eq!(kind.step_title(0), "");
        assert_eq!(kind.step_title(6), "");
    }

    #[test]
    fn review_steps_are_detected() {
        assert!(WizardKind::FineTuningProject.has_review_step());
        assert!(WizardKind::Prompt.has_review_step());
        assert!(!WizardKind::RagPipeline.has_review_step());
        assert!(!WizardKind::Deployment.has_review_step());
    }
}
