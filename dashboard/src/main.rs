use finetun_dashboard::config::UiMode;
use std::io::IsTerminal;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let config = finetun_dashboard::load_config();

    // Non-interactive wizard proof mode: drives every wizard, prints the
    // event transcript and exits 0/1.
    if args.iter().any(|a| a == "--wizard-smoke") {
        finetun_dashboard::run_wizard_smoke(&config);
        return;
    }

    // Renders a single frame for a page or wizard and exits 0/1.
    // Usage: --tui-smoke or --tui-smoke=rag|fine-tuning|models|prompts|deploy|playground|not-found|toast|wizard|wizard-review|wizard-<kind>
    if let Some(arg) = args
        .iter()
        .find(|a| a.as_str() == "--tui-smoke" || a.starts_with("--tui-smoke="))
    {
        let target = arg
            .split_once('=')
            .map(|(_, v)| v.to_string())
            .filter(|v| !v.trim().is_empty());
        finetun_dashboard::run_tui_smoke(&config, target);
        return;
    }

    // Overrides: --tui forces the terminal UI, --headless the smoke run.
    // Otherwise `ui` from settings (FINETUN_UI=auto|tui|headless).
    let run_tui = match finetun_dashboard::select_ui_mode(&args, &config) {
        UiMode::Tui => true,
        UiMode::Headless => false,
        UiMode::Auto => std::io::stdout().is_terminal(),
    };

    if run_tui {
        finetun_dashboard::run_tui(config);
    } else {
        finetun_dashboard::run_headless(&config);
    }
}
