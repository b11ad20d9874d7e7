// Read-only mock data shown by the dashboard pages.
//
// The built-in set mirrors the demo content. A TOML or JSON file can replace
// any section; sections missing from the file keep their built-in values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixtures file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML fixtures: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON fixtures: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported fixtures format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTab {
    pub id: String,
    pub label: String,
}

impl CategoryTab {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagModel {
    pub id: u32,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Training,
    Completed,
    Paused,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Training => "Training",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Paused => "Paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub model: String,
    pub status: ProjectStatus,
    /// Percent, 0..=100.
    pub progress: u8,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: u32,
    pub name: String,
    pub model: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub requests: String,
    pub last_deployed: String,
}

impl Deployment {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCollection {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundModel {
    pub name: String,
    pub category: String,
    pub fine_tuned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub description: String,
}

impl StatCard {
    fn new(title: &str, value: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Fixtures {
    pub rag_categories: Vec<CategoryTab>,
    pub rag_models: Vec<RagModel>,
    pub model_categories: Vec<CategoryTab>,
    pub models: Vec<CatalogModel>,
    pub projects: Vec<Project>,
    pub fine_tuning_stats: Vec<StatCard>,
    pub deployments: Vec<Deployment>,
    pub deployment_stats: Vec<StatCard>,
    pub prompt_collections: Vec<PromptCollection>,
    pub playground_models: Vec<PlaygroundModel>,
}

fn rag_model(id: u32, title: &str, category: &str) -> RagModel {
    RagModel {
        id,
        title: title.to_string(),
        category: category.to_string(),
    }
}

fn catalog_model(id: u32, title: &str, category: &str, status: &str) -> CatalogModel {
    CatalogModel {
        id,
        title: title.to_string(),
        category: category.to_string(),
        status: status.to_string(),
    }
}

fn project(
    id: u32,
    name: &str,
    model: &str,
    status: ProjectStatus,
    progress: u8,
    last_updated: &str,
) -> Project {
    Project {
        id,
        name: name.to_string(),
        model: model.to_string(),
        status,
        progress,
        last_updated: last_updated.to_string(),
    }
}

fn deployment(
    id: u32,
    name: &str,
    model: &str,
    status: &str,
    kind: &str,
    requests: &str,
    last_deployed: &str,
) -> Deployment {
    Deployment {
        id,
        name: name.to_string(),
        model: model.to_string(),
        status: status.to_string(),
        kind: kind.to_string(),
        requests: requests.to_string(),
        last_deployed: last_deployed.to_string(),
    }
}

fn collection(id: u32, title: &str, description: &str, count: u32) -> PromptCollection {
    PromptCollection {
        id,
        title: title.to_string(),
        description: description.to_string(),
        count,
    }
}

fn playground_model(name: &str, category: &str, fine_tuned: bool) -> PlaygroundModel {
    PlaygroundModel {
        name: name.to_string(),
        category: category.to_string(),
        fine_tuned,
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            rag_categories: vec![
                CategoryTab::new("text-to-text", "Text-to-text"),
                CategoryTab::new("embeddings", "Embeddings"),
                CategoryTab::new("text-to-image", "Text-to-image"),
            ],
            rag_models: vec![
                rag_model(1, "Meta-Llama-3.1-Nemotrn-70B-Instruct-HF", "Text-to-text"),
                rag_model(2, "DeepSeek-V3-0324", "Embeddings"),
                rag_model(3, "DeepSeek-V3", "Text-to-image"),
                rag_model(4, "Llama-3.3-70B-Instruct", "Text-to-text"),
                rag_model(5, "Qwen2.5-Coder-7B", "Text-to-text"),
                rag_model(6, "Gemma-2-2b-it", "Text-to-text"),
                rag_model(7, "FineTunAI model 1", "Text-to-text"),
                rag_model(8, "FineTunAI model 2", "Embeddings"),
                rag_model(9, "FineTunAI model 3", "Text-to-image"),
            ],
            model_categories: vec![
                CategoryTab::new("all", "All Models"),
                CategoryTab::new("llm", "LLMs"),
                CategoryTab::new("vision", "Vision"),
                CategoryTab::new("embeddings", "Embeddings"),
            ],
            models: vec![
                catalog_model(1, "Meta-Llama-3.1-Nemotrn-70B-Instruct-HF", "LLMs", "Ready"),
                catalog_model(2, "DeepSeek-V3-0324", "Embeddings", "Training"),
                catalog_model(3, "DALL-E 3", "Vision", "Ready"),
                catalog_model(4, "Llama-3.3-70B-Instruct", "LLMs", "Ready"),
                catalog_model(5, "Qwen2.5-Coder-7B", "LLMs", "Ready"),
                catalog_model(6, "Gemma-2-2b-it", "LLMs", "Fine-tuning"),
                catalog_model(7, "FineTunAI Vision Model", "Vision", "Ready"),
                catalog_model(8, "FineTunAI Embedding Model", "Embeddings", "Ready"),
                catalog_model(9, "Custom GPT-4o Model", "LLMs", "Pending"),
            ],
            projects: vec![
                project(
                    1,
                    "Customer Support Bot",
                    "Llama-3.3-70B",
                    ProjectStatus::Training,
                    67,
                    "2 hours ago",
                ),
                project(
                    2,
                    "Content Moderation",
                    "GPT-4o",
                    ProjectStatus::Completed,
                    100,
                    "1 day ago",
                ),
                project(
                    3,
                    "Code Assistant",
                    "Qwen2.5-Coder-7B",
                    ProjectStatus::Paused,
                    45,
                    "3 days ago",
                ),
            ],
            fine_tuning_stats: vec![
                StatCard::new("Active Fine-tunes", "3", "2 in progress, 1 queued"),
                StatCard::new("GPU Usage", "68%", "4 GPUs active"),
                StatCard::new("Storage", "456 GB", "23% used of 2 TB"),
                StatCard::new("Training Data", "15.4 GB", "5 datasets"),
            ],
            deployments: vec![
                deployment(
                    1,
                    "Customer Service Bot",
                    "Llama-3.3-70B-Instruct",
                    "Active",
                    "API",
                    "1.2k/day",
                    "3 days ago",
                ),
                deployment(
                    2,
                    "Content Moderator",
                    "Content Moderation Model",
                    "Active",
                    "Webhook",
                    "567/day",
                    "1 week ago",
                ),
                deployment(
                    3,
                    "Code Assistant API",
                    "Qwen2.5-Coder-7B",
                    "Inactive",
                    "API",
                    "0/day",
                    "2 weeks ago",
                ),
            ],
            deployment_stats: vec![
                StatCard::new("API Endpoints", "2", "Active REST APIs"),
                StatCard::new("Webhooks", "1", "Connected integrations"),
                StatCard::new("Requests", "1.8k", "Daily average (last 7 days)"),
            ],
            prompt_collections: vec![
                collection(
                    1,
                    "Customer Support",
                    "Templates for handling customer inquiries",
                    12,
                ),
                collection(
                    2,
                    "Content Creation",
                    "Prompts for generating marketing content",
                    8,
                ),
                collection(
                    3,
                    "Code Generation",
                    "Templates for software development tasks",
                    15,
                ),
                collection(
                    4,
                    "Data Analysis",
                    "Prompts for analyzing datasets and creating insights",
                    6,
                ),
                collection(
                    5,
                    "Personal Assistant",
                    "Templates for scheduling, reminders, and task management",
                    9,
                ),
                collection(
                    6,
                    "Creative Writing",
                    "Prompts for storytelling and creative content",
                    11,
                ),
            ],
            playground_models: vec![
                playground_model("Llama-3.3-70B-Instruct", "LLM", true),
                playground_model("GPT-4o Custom", "LLM", true),
                playground_model("Qwen2.5-Coder-7B", "Code", false),
                playground_model("DALL-E 3", "Vision", false),
            ],
        }
    }
}

impl Fixtures {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, FixtureError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a fixtures file; the format follows the file extension.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match ext.as_str() {
            "toml" => Self::from_toml_str(&raw),
            "json" => Self::from_json_str(&raw),
            other => Err(FixtureError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn project(&self, id: u32) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn playground_model_names(&self) -> Vec<String> {
        self.playground_models.iter().map(|m| m.name.clone()).collect()
    }
}
