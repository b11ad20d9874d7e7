// Runtime settings.
//
// Layering (later wins): built-in defaults, `<config_dir>/finetun/config.toml`,
// `./finetun.toml`, then `FINETUN_*` environment variables.

use crate::models::fixtures::Fixtures;
use crate::routes::Route;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "FINETUN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    /// Terminal UI when stdout is a terminal, headless smoke otherwise.
    #[default]
    Auto,
    Tui,
    Headless,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiMode,
    pub submit_delay_ms: u64,
    pub generate_delay_ms: u64,
    pub toast_ttl_ms: u64,
    pub initial_route: String,
    pub log_dir: Option<PathBuf>,
    pub fixtures_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ui: UiMode::Auto,
            submit_delay_ms: 1500,
            generate_delay_ms: 1500,
            toast_ttl_ms: 5000,
            initial_route: "/".to_string(),
            log_dir: None,
            fixtures_path: None,
        }
    }
}

/// Candidate settings files, lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        out.push(dir.join("finetun").join("config.toml"));
    }
    out.push(PathBuf::from("finetun.toml"));
    out
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_file_candidates(), ENV_PREFIX)
    }

    /// Layer the given files (missing ones are skipped) and env vars under `env_prefix`.
    pub fn load_from(files: &[PathBuf], env_prefix: &str) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        for file in files {
            builder = builder.add_source(config::File::from(file.as_path()).required(false));
        }
        builder = builder.add_source(config::Environment::with_prefix(env_prefix).try_parsing(true));

        let settings: AppConfig = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.toast_ttl_ms == 0 {
            anyhow::bail!("toast_ttl_ms must be greater than zero");
        }
        if Route::resolve(&self.initial_route) == Route::NotFound {
            anyhow::bail!("initial_route '{}' is not a dashboard page", self.initial_route);
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn generate_delay(&self) -> Duration {
        Duration::from_millis(self.generate_delay_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    pub fn initial_route(&self) -> Route {
        Route::resolve(&self.initial_route)
    }

    /// Fixtures from `fixtures_path`, or the built-in set.
    pub fn load_fixtures(&self) -> anyhow::Result<Fixtures> {
        match &self.fixtures_path {
            Some(path) => Fixtures::load(path)
                .with_context(|| format!("Failed to load fixtures from {}", path.display())),
            None => Ok(Fixtures::builtin()),
        }
    }

    pub fn log_dir_override(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let cfg = AppConfig::load_from(&[], "FINETUN_TEST_NONE").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.submit_delay(), Duration::from_millis(1500));
        assert_eq!(cfg.initial_route(), Route::Rag);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finetun.toml");
        std::fs::write(
            &path,
            "ui = \"headless\"\nsubmit_delay_ms = 0\ninitial_route = \"/playground\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&[path], "FINETUN_TEST_FILE").unwrap();
        assert_eq!(cfg.ui, UiMode::Headless);
        assert_eq!(cfg.submit_delay_ms, 0);
        assert_eq!(cfg.initial_route(), Route::Playground);
        assert_eq!(cfg.toast_ttl_ms, 5000);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finetun.toml");
        std::fs::write(&path, "generate_delay_ms = 10\n").unwrap();

        std::env::set_var("FINETUN_TEST_ENV_GENERATE_DELAY_MS", "25");
        let cfg = AppConfig::load_from(&[path], "FINETUN_TEST_ENV").unwrap();
        std::env::remove_var("FINETUN_TEST_ENV_GENERATE_DELAY_MS");

        assert_eq!(cfg.generate_delay_ms, 25);
    }

    #[test]
    fn missing_files_are_skipped() {
        let cfg = AppConfig::load_from(
            &[PathBuf::from("/no/such/dir/finetun.toml")],
            "FINETUN_TEST_MISSING",
        )
        .unwrap();
        assert_eq!(cfg.ui, UiMode::Auto);
    }

    #[test]
    fn unknown_initial_route_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finetun.toml");
        std::fs::write(&path, "initial_route = \"/billing\"\n").unwrap();
        assert!(AppConfig::load_from(&[path], "FINETUN_TEST_ROUTE").is_err());
    }

    #[test]
    fn fixtures_path_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("fixtures.toml");
        std::fs::write(&fixtures, "playground_models = []\n").unwrap();

        let cfg = AppConfig {
            fixtures_path: Some(fixtures),
            ..AppConfig::default()
        };
        let loaded = cfg.load_fixtures().unwrap();
        assert!(loaded.playground_models.is_empty());
        assert_eq!(loaded.projects.len(), 3);
    }
}
