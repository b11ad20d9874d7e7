// FineTunAI dashboard
// Library entry point: logging setup and the run modes the binary dispatches to.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod models;
pub mod routes;
pub mod smoke;
pub mod tui;
pub mod utils;
pub mod wizard;

use crate::config::{AppConfig, UiMode};
use log::{error, info};
use std::path::Path;
use utils::logging::LogLine;
use utils::path_resolver::{log_file_paths, resolve_deployment_folder, resolve_log_folder};

/// Initialize logging with dual format (JSON + human-readable).
///
/// - JSON lines to `dashboard-<ts>.log`
/// - Human-readable lines to `dashboard-<ts>.txt`
/// - Optionally human-readable to stdout (off while the terminal UI owns the screen)
pub fn init_logging(
    with_stdout: bool,
    log_dir_override: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = resolve_log_folder(log_dir_override)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S").to_string();
    let (json_log_file, txt_log_file) = log_file_paths(&log_dir, &timestamp);

    let mut dispatch = fern::Dispatch::new().level(log::LevelFilter::Debug);

    if with_stdout {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Info)
                .format(|out, message, record| {
                    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
                    let line = LogLine::new(&ts, record.level(), record.target(), &message.to_string());
                    out.finish(format_args!("{}", line.to_text()))
                })
                .chain(std::io::stdout()),
        );
    }

    dispatch = dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let ts = chrono::Utc::now().to_rfc3339();
                    let line = LogLine::new(&ts, record.level(), record.target(), &message.to_string());
                    out.finish(format_args!("{}\n", line.to_json()))
                })
                .chain(fern::log_file(json_log_file)?),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
                    let line = LogLine::new(&ts, record.level(), record.target(), &message.to_string());
                    out.finish(format_args!("{}\n", line.to_text()))
                })
                .chain(fern::log_file(txt_log_file)?),
        );

    dispatch.apply()?;

    info!(
        "[PHASE: initialization] Logging initialized, log directory: {:?}",
        log_dir
    );
    Ok(())
}

/// Settings for this run. An invalid file is reported once and defaults are used.
pub fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Ignoring invalid configuration: {:#}", e);
            AppConfig::default()
        }
    }
}

fn start(mode: &str, config: &AppConfig) {
    if let Err(e) = init_logging(false, config.log_dir_override()) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    info!(
        "[PHASE: initialization] {} starting at {}",
        mode,
        chrono::Utc::now()
    );
    info!(
        "[PHASE: initialization] [STEP: deployment_folder] Deployment folder: {:?}",
        resolve_deployment_folder()
    );
}

/// Interactive terminal dashboard.
pub fn run_tui(config: AppConfig) {
    start("Terminal dashboard", &config);
    let result = config
        .load_fixtures()
        .and_then(|fixtures| tui::run(&config, fixtures));
    if let Err(e) = result {
        error!("[PHASE: tui] [STEP: fatal] TUI exited with error: {:?}", e);
        eprintln!("Dashboard error: {:#}", e);
        std::process::exit(1);
    }
}

/// Render a single frame of `target` off-screen and exit.
pub fn run_tui_smoke(config: &AppConfig, target: Option<String>) {
    start("TUI smoke", config);
    let target = target.as_deref().unwrap_or("rag");
    if let Err(e) = tui::smoke(target) {
        error!("[PHASE: tui] [STEP: smoke] TUI smoke exited with error: {:?}", e);
        eprintln!("Dashboard error: {:#}", e);
        std::process::exit(1);
    }
    println!("TUI smoke ok: {}", target);
}

/// Drive every wizard headlessly and print the event transcript. Exits 0/1.
pub fn run_wizard_smoke(config: &AppConfig) {
    start("Wizard smoke", config);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let result = match rt {
        Ok(rt) => rt.block_on(smoke::wizard_transcript()),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to create async runtime for wizard smoke: {}",
            e
        )),
    };

    match result {
        Ok(lines) => {
            for line in &lines {
                println!("{}", line);
            }
            info!(
                "[PHASE: smoke] [STEP: done] Wizard smoke passed ({} events)",
                lines.len()
            );
        }
        Err(e) => {
            error!("[PHASE: smoke] [STEP: failed] {:#}", e);
            eprintln!("Wizard smoke failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Headless mode: no terminal available, run the wizard smoke instead.
pub fn run_headless(config: &AppConfig) {
    eprintln!("No interactive terminal detected; running the headless wizard smoke.");
    run_wizard_smoke(config);
}

/// `--tui` / `--headless` override `ui` from settings (`FINETUN_UI`).
pub fn select_ui_mode(args: &[String], config: &AppConfig) -> UiMode {
    if args.iter().any(|a| a == "--tui") {
        UiMode::Tui
    } else if args.iter().any(|a| a == "--headless") {
        UiMode::Headless
    } else {
        config.ui
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn ui_mode_comes_from_the_loaded_settings() {
        let config = AppConfig {
            ui: UiMode::Headless,
            ..AppConfig::default()
        };
        assert_eq!(select_ui_mode(&args(&["finetun-dashboard"]), &config), UiMode::Headless);
    }

    #[test]
    fn flags_override_settings() {
        let config = AppConfig::default();
        assert_eq!(select_ui_mode(&args(&["x", "--tui"]), &config), UiMode::Tui);
        assert_eq!(select_ui_mode(&args(&["x", "--headless"]), &config), UiMode::Headless);
    }
}
