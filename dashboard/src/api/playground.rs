// Playground: prompt in, simulated completion out.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PLAYGROUND_MODEL: &str = "Llama-3.3-70B-Instruct";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaygroundError {
    #[error("{name} must be between {min} and {max}")]
    OutOfRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Generation failed: {0}")]
    Generation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundSettings {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub stream: bool,
    pub log_requests: bool,
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 0.95,
            stream: true,
            log_requests: true,
        }
    }
}

impl PlaygroundSettings {
    pub const MAX_TOKENS_RANGE: (u32, u32) = (256, 4096);

    pub fn validate(&self) -> Result<(), PlaygroundError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(PlaygroundError::OutOfRange {
                name: "Temperature",
                min: 0.0,
                max: 1.0,
            });
        }
        let (lo, hi) = Self::MAX_TOKENS_RANGE;
        if !(lo..=hi).contains(&self.max_tokens) {
            return Err(PlaygroundError::OutOfRange {
                name: "Max tokens",
                min: lo as f64,
                max: hi as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(PlaygroundError::OutOfRange {
                name: "Top P",
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        settings: &PlaygroundSettings,
    ) -> Result<String, PlaygroundError>;
}

/// Canned answer after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGenerator {
    delay: Duration,
}

impl SimulatedGenerator {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

pub fn simulated_response(model: &str, prompt: &str) -> String {
    format!(
        "As a {} model, I've analyzed your request and here's my response:\n\n\
         This is a simulated response to your prompt: \"{}\"\n\n\
         In a real implementation, this would connect to the actual model API to generate a \
         response based on your input. The playground allows you to test different prompts, \
         compare models, and fine-tune your parameters to get the optimal results for your use case.",
        model, prompt
    )
}

#[async_trait]
impl ResponseGenerator for SimulatedGenerator {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        _settings: &PlaygroundSettings,
    ) -> Result<String, PlaygroundError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(simulated_response(model, prompt))
    }
}

/// Session state of the playground page.
pub struct Playground {
    models: Vec<String>,
    selected_model: String,
    prompt: String,
    settings: PlaygroundSettings,
    response: Option<String>,
    generator: Arc<dyn ResponseGenerator>,
}

impl Playground {
    pub fn new(models: Vec<String>, generator: Arc<dyn ResponseGenerator>) -> Self {
        let selected_model = if models.iter().any(|m| m == DEFAULT_PLAYGROUND_MODEL) {
            DEFAULT_PLAYGROUND_MODEL.to_string()
        } else {
            models
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_PLAYGROUND_MODEL.to_string())
        };
        Self {
            models,
            selected_model,
            prompt: String::new(),
            settings: PlaygroundSettings::default(),
            response: None,
            generator,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// Returns false when the model is not offered.
    pub fn select_model(&mut self, model: &str) -> bool {
        if !self.models.iter().any(|m| m == model) {
            return false;
        }
        self.selected_model = model.to_string();
        true
    }

    /// Move the selection by `delta` positions, wrapping around.
    pub fn cycle_model(&mut self, delta: isize) {
        if self.models.is_empty() {
            return;
        }
        let len = self.models.len() as isize;
        let current = self
            .models
            .iter()
            .position(|m| *m == self.selected_model)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.selected_model = self.models[next].clone();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt_mut(&mut self) -> &mut String {
        &mut self.prompt
    }

    pub fn settings(&self) -> &PlaygroundSettings {
        &self.settings
    }

    /// Replace the settings; rejected values leave the current ones in place.
    pub fn update_settings(&mut self, settings: PlaygroundSettings) -> Result<(), PlaygroundError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn generator(&self) -> Arc<dyn ResponseGenerator> {
        Arc::clone(&self.generator)
    }

    /// Store a response produced elsewhere (event-loop hosts).
    pub fn set_response(&mut self, response: String) {
        self.response = Some(response);
    }

    /// Run the generator for the current prompt. Blank prompts are ignored.
    pub async fn generate(&mut self) -> Result<Option<&str>, PlaygroundError> {
        if self.prompt.trim().is_empty() {
            return Ok(None);
        }
        self.response = None;
        if self.settings.log_requests {
            info!(
                "[PHASE: playground] [STEP: generate] model={} prompt_chars={} temperature={} max_tokens={}",
                self.selected_model,
                self.prompt.chars().count(),
                self.settings.temperature,
                self.settings.max_tokens
            );
        }
        let generator = Arc::clone(&self.generator);
        let text = generator
            .generate(&self.selected_model, &self.prompt, &self.settings)
            .await?;
        self.response = Some(text);
        Ok(self.response.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResponseGenerator for CountingGenerator {
        async fn generate(
            &self,
            model: &str,
            prompt: &str,
            _settings: &PlaygroundSettings,
        ) -> Result<String, PlaygroundError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}:{}", model, prompt))
        }
    }

    fn models() -> Vec<String> {
        vec![
            "GPT-4o Custom".to_string(),
            "Llama-3.3-70B-Instruct".to_string(),
            "Qwen2.5-Coder-7B".to_string(),
        ]
    }

    #[test]
    fn default_settings_match_the_panel() {
        let s = PlaygroundSettings::default();
        assert_eq!(s.max_tokens, 1024);
        assert!((s.temperature - 0.7).abs() < f64::EPSILON);
        assert!((s.top_p - 0.95).abs() < f64::EPSILON);
        assert!(s.stream && s.log_requests);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn out_of_range_settings_are_rejected() {
        let generator = Arc::new(SimulatedGenerator::new(Duration::ZERO));
        let mut p = Playground::new(models(), generator);
        let bad = PlaygroundSettings {
            max_tokens: 8192,
            ..PlaygroundSettings::default()
        };
        assert!(matches!(
            p.update_settings(bad),
            Err(PlaygroundError::OutOfRange { name: "Max tokens", .. })
        ));
        assert_eq!(p.settings().max_tokens, 1024);
    }

    #[test]
    fn default_model_is_preselected_and_cycles() {
        let generator = Arc::new(SimulatedGenerator::new(Duration::ZERO));
        let mut p = Playground::new(models(), generator);
        assert_eq!(p.selected_model(), DEFAULT_PLAYGROUND_MODEL);

        p.cycle_model(1);
        assert_eq!(p.selected_model(), "Qwen2.5-Coder-7B");
        p.cycle_model(1);
        assert_eq!(p.selected_model(), "GPT-4o Custom");
        p.cycle_model(-1);
        assert_eq!(p.selected_model(), "Qwen2.5-Coder-7B");
        assert!(!p.select_model("DALL-E 4"));
    }

    #[tokio::test]
    async fn blank_prompt_does_not_call_generator() {
        let generator = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
        });
        let mut p = Playground::new(models(), generator.clone());
        p.set_prompt("   ");

        assert_eq!(p.generate().await.unwrap(), None);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_generator_echoes_prompt_after_delay() {
        let mut p = Playground::new(models(), Arc::new(SimulatedGenerator::default()));
        p.set_prompt("Summarize our refund policy");

        let started = tokio::time::Instant::now();
        let text = p.generate().await.unwrap().map(str::to_string).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert!(text.starts_with("As a Llama-3.3-70B-Instruct model"));
        assert!(text.contains("\"Summarize our refund policy\""));
        assert_eq!(p.response(), Some(text.as_str()));
    }
}
