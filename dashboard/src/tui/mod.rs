//! Terminal dashboard.
//!
//! Layout:
//! - Centered window titled "FineTunAI"
//! - Sidebar with the pages on the left, page content on the right
//! - Key hints on the bottom row
//! - Creation wizards open as a modal with `[ Back ] [ Next ] [ Cancel ]`
//! - Toasts stack in the top-right corner until they expire
//!
//! Submissions and playground generations run on a tokio runtime owned by the
//! UI; results come back over a channel and are applied on the UI thread.
//! Logging is file-only while the terminal UI runs.

mod draw;

use crate::api::notify::Notification;
use crate::api::playground::{PlaygroundError, SimulatedGenerator};
use crate::api::submission::{SimulatedSubmitter, SubmitError};
use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::models::fixtures::Fixtures;
use crate::routes::Route;
use crate::wizard::{
    FieldKind, FieldSpec, FieldValue, FileRef, PendingSubmission, StepForward, WizardKind,
    WizardPhase,
};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{info, warn};
use ratatui::backend::{CrosstermBackend, TestBackend};
use ratatui::Terminal;
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Content,
    Search,
    PromptEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonFocus {
    Back,
    Next,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardFocus {
    Field(usize),
    Button(ButtonFocus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modal {
    ConfirmQuit { yes_focused: bool },
}

#[derive(Debug)]
enum UiMsg {
    SubmitFinished {
        correlation_id: String,
        result: Result<(), SubmitError>,
    },
    GenerateFinished {
        result: Result<String, PlaygroundError>,
    },
}

/// Single-line editor. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TextInput {
    value: String,
    cursor: usize,
    masked: bool,
}

impl TextInput {
    fn new(value: &str, masked: bool) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            masked,
        }
    }

    fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = value.chars().count();
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        let len = self.value.chars().count();
        match code {
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(len);
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = len;
                true
            }
            _ => false,
        }
    }
}

struct InFlight {
    pending: PendingSubmission,
    task: JoinHandle<()>,
}

/// Screen-side state of the open wizard; the controller lives in the dashboard.
struct WizardUi {
    focus: WizardFocus,
    inputs: HashMap<&'static str, TextInput>,
    error: Option<String>,
    in_flight: Option<InFlight>,
}

impl WizardUi {
    fn new(kind: WizardKind) -> Self {
        let inputs = kind
            .fields()
            .iter()
            .filter(|f| {
                matches!(
                    f.kind,
                    FieldKind::Text | FieldKind::Secret | FieldKind::File
                )
            })
            .map(|f| (f.name, TextInput::new("", f.is_secret())))
            .collect();
        Self {
            focus: first_focus(kind, 1),
            inputs,
            error: None,
            in_flight: None,
        }
    }
}

fn step_fields(kind: WizardKind, step: usize) -> Vec<&'static FieldSpec> {
    kind.fields_for_step(step).collect()
}

fn first_focus(kind: WizardKind, step: usize) -> WizardFocus {
    if kind.fields_for_step(step).next().is_some() {
        WizardFocus::Field(0)
    } else {
        WizardFocus::Button(ButtonFocus::Next)
    }
}

fn focus_order(kind: WizardKind, step: usize) -> Vec<WizardFocus> {
    let mut order: Vec<WizardFocus> = (0..kind.fields_for_step(step).count())
        .map(WizardFocus::Field)
        .collect();
    order.push(WizardFocus::Button(ButtonFocus::Back));
    order.push(WizardFocus::Button(ButtonFocus::Next));
    order.push(WizardFocus::Button(ButtonFocus::Cancel));
    order
}

struct UiState {
    dashboard: Dashboard,
    focus: Focus,
    sidebar_index: usize,
    card_index: usize,
    search: TextInput,
    prompt_input: TextInput,
    modal: Option<Modal>,
    wizard_ui: Option<WizardUi>,
    generating: Option<JoinHandle<()>>,
    quit: bool,
}

impl UiState {
    fn new(dashboard: Dashboard) -> Self {
        let sidebar_index = Route::PAGES
            .iter()
            .position(|r| *r == dashboard.route())
            .unwrap_or(0);
        let prompt_input = TextInput::new(dashboard.playground().prompt(), false);
        let search = TextInput::new(dashboard.prompt_query(), false);
        Self {
            dashboard,
            focus: Focus::Sidebar,
            sidebar_index,
            card_index: 0,
            search,
            prompt_input,
            modal: None,
            wizard_ui: None,
            generating: None,
            quit: false,
        }
    }

    fn card_count(&self) -> usize {
        match self.dashboard.route() {
            Route::Rag => self.dashboard.visible_rag_models().len(),
            Route::FineTuning => self.dashboard.fixtures().projects.len(),
            Route::Models => self.dashboard.visible_models().len(),
            Route::Prompts => self.dashboard.visible_prompts().len(),
            Route::Deploy => self.dashboard.fixtures().deployments.len(),
            Route::Playground | Route::NotFound => 0,
        }
    }
}

pub fn run(config: &AppConfig, fixtures: Fixtures) -> Result<()> {
    info!("[PHASE: tui] [STEP: start] Starting terminal dashboard");
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut state = UiState::new(build_dashboard(config, fixtures)?);
    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &mut state, rt.handle());
    restore_terminal(&mut terminal)?;

    if let Some(ui) = state.wizard_ui.take() {
        if let Some(in_flight) = ui.in_flight {
            in_flight.task.abort();
        }
    }
    info!("[PHASE: tui] [STEP: exit] Terminal dashboard closed");
    result
}

fn build_dashboard(config: &AppConfig, fixtures: Fixtures) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(
        fixtures,
        Arc::new(SimulatedSubmitter::new(config.submit_delay())),
        Arc::new(SimulatedGenerator::new(config.generate_delay())),
        config.toast_ttl(),
    )?;
    dashboard.go_to(config.initial_route());
    Ok(dashboard)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut UiState,
    rt: &Handle,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<UiMsg>();
    let mut last_tick = Instant::now();

    loop {
        drain_messages(state, &rx);
        terminal.draw(|f| draw::draw(f.size(), f, state))?;

        if state.quit {
            return Ok(());
        }

        let timeout = TICK
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(state, key.code, &tx, rt);
                }
            }
        }
        if last_tick.elapsed() >= TICK {
            last_tick = Instant::now();
        }
    }
}

fn drain_messages(state: &mut UiState, rx: &mpsc::Receiver<UiMsg>) {
    while let Ok(msg) = rx.try_recv() {
        match msg {
            UiMsg::SubmitFinished {
                correlation_id,
                result,
            } => finish_submission(state, &correlation_id, result),
            UiMsg::GenerateFinished { result } => {
                state.generating = None;
                match result {
                    Ok(text) => state.dashboard.playground_mut().set_response(text),
                    Err(e) => {
                        warn!("[PHASE: playground] [STEP: generate_failed] {}", e);
                        state
                            .dashboard
                            .notify(Notification::destructive("Generation Failed", e.to_string()));
                    }
                }
            }
        }
    }
}

fn finish_submission(state: &mut UiState, correlation_id: &str, result: Result<(), SubmitError>) {
    let in_flight = match state.wizard_ui.as_mut() {
        Some(ui)
            if ui
                .in_flight
                .as_ref()
                .map(|f| f.pending.correlation_id == correlation_id)
                .unwrap_or(false) =>
        {
            ui.in_flight.take()
        }
        _ => None,
    };
    let Some(in_flight) = in_flight else {
        info!(
            "[PHASE: tui] [STEP: submit_drop] correlation_id={} has no open wizard",
            correlation_id
        );
        return;
    };
    let Some(wizard) = state.dashboard.wizard_mut() else {
        return;
    };

    let outcome = wizard.finish_submit(in_flight.pending, result);
    match outcome {
        Ok(_) => {
            state.dashboard.reap_wizard();
            state.wizard_ui = None;
        }
        Err(e) => {
            if let Some(ui) = state.wizard_ui.as_mut() {
                ui.error = Some(e.to_string());
                ui.focus = WizardFocus::Button(ButtonFocus::Next);
            }
        }
    }
}

fn handle_key(state: &mut UiState, code: KeyCode, tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
    if state.modal.is_some() {
        handle_modal_key(state, code);
        return;
    }
    if state.wizard_ui.is_some() {
        handle_wizard_key(state, code, tx, rt);
        return;
    }
    match state.focus {
        Focus::Sidebar => handle_sidebar_key(state, code),
        Focus::Content => handle_content_key(state, code),
        Focus::Search => handle_search_key(state, code),
        Focus::PromptEditor => handle_prompt_key(state, code, tx, rt),
    }
}

fn handle_modal_key(state: &mut UiState, code: KeyCode) {
    let Some(Modal::ConfirmQuit { yes_focused }) = state.modal else {
        return;
    };
    match code {
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
            state.modal = Some(Modal::ConfirmQuit {
                yes_focused: !yes_focused,
            });
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => state.quit = true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.modal = None,
        KeyCode::Enter => {
            if yes_focused {
                state.quit = true;
            } else {
                state.modal = None;
            }
        }
        _ => {}
    }
}

fn go_to(state: &mut UiState, route: Route) {
    close_wizard(state);
    state.dashboard.go_to(route);
    if let Some(idx) = Route::PAGES.iter().position(|r| *r == route) {
        state.sidebar_index = idx;
    }
    state.card_index = 0;
}

fn open_wizard(state: &mut UiState, kind: WizardKind) {
    close_wizard(state);
    state.dashboard.open_wizard(kind);
    state.wizard_ui = Some(WizardUi::new(kind));
}

/// Dismiss the open wizard. A submission still running is aborted and its
/// result, if it ever arrives, is dropped.
fn close_wizard(state: &mut UiState) {
    if let Some(ui) = state.wizard_ui.take() {
        if let Some(in_flight) = ui.in_flight {
            info!(
                "[PHASE: tui] [STEP: submit_abort] correlation_id={}",
                in_flight.pending.correlation_id
            );
            in_flight.task.abort();
        }
    }
    state.dashboard.dismiss_wizard();
}

fn handle_sidebar_key(state: &mut UiState, code: KeyCode) {
    let pages = Route::PAGES.len();
    match code {
        KeyCode::Up => state.sidebar_index = (state.sidebar_index + pages - 1) % pages,
        KeyCode::Down => state.sidebar_index = (state.sidebar_index + 1) % pages,
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as usize) - ('1' as usize);
            go_to(state, Route::PAGES[idx]);
            state.focus = Focus::Content;
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Tab => {
            let route = Route::PAGES[state.sidebar_index];
            if route != state.dashboard.route() {
                go_to(state, route);
            }
            state.focus = Focus::Content;
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            state.modal = Some(Modal::ConfirmQuit { yes_focused: false })
        }
        KeyCode::Char('x') => state.dashboard.toasts().dismiss_all(),
        _ => {}
    }
}

fn handle_content_key(state: &mut UiState, code: KeyCode) {
    let route = state.dashboard.route();
    match code {
        KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
            state.focus = Focus::Sidebar;
            return;
        }
        KeyCode::Char('q') => {
            state.modal = Some(Modal::ConfirmQuit { yes_focused: false });
            return;
        }
        KeyCode::Char('x') => {
            state.dashboard.toasts().dismiss_all();
            return;
        }
        KeyCode::Char('n') => {
            if let Some(kind) = crate::dashboard::page_wizard(route) {
                open_wizard(state, kind);
            }
            return;
        }
        KeyCode::Up => {
            state.card_index = state.card_index.saturating_sub(1);
            return;
        }
        KeyCode::Down => {
            let count = state.card_count();
            if count > 0 {
                state.card_index = (state.card_index + 1).min(count - 1);
            }
            return;
        }
        _ => {}
    }

    match route {
        Route::Rag => match code {
            KeyCode::Left => {
                state.dashboard.rag_tabs_mut().select_prev();
                state.card_index = 0;
            }
            KeyCode::Right => {
                state.dashboard.rag_tabs_mut().select_next();
                state.card_index = 0;
            }
            KeyCode::Enter if state.card_count() > 0 => {
                close_wizard(state);
                state.dashboard.activate_rag_model();
                state.wizard_ui = Some(WizardUi::new(WizardKind::RagPipeline));
            }
            _ => {}
        },
        Route::FineTuning => {
            if code == KeyCode::Enter {
                let id = state
                    .dashboard
                    .fixtures()
                    .projects
                    .get(state.card_index)
                    .map(|p| p.id);
                if let Some(id) = id {
                    state.dashboard.activate_project(id);
                }
            }
        }
        Route::Models => match code {
            KeyCode::Left => {
                state.dashboard.model_tabs_mut().select_prev();
                state.card_index = 0;
            }
            KeyCode::Right => {
                state.dashboard.model_tabs_mut().select_next();
                state.card_index = 0;
            }
            KeyCode::Enter | KeyCode::Char('f') => {
                let title = state
                    .dashboard
                    .visible_models()
                    .get(state.card_index)
                    .map(|m| m.title.clone());
                if let Some(title) = title {
                    if code == KeyCode::Enter {
                        state.dashboard.open_model_in_playground(&title);
                    } else {
                        state.dashboard.fine_tune_model(&title);
                    }
                    let route = state.dashboard.route();
                    go_to(state, route);
                }
            }
            _ => {}
        },
        Route::Prompts => {
            if code == KeyCode::Char('/') {
                state.focus = Focus::Search;
            }
        }
        Route::Playground => match code {
            KeyCode::Left => state.dashboard.playground_mut().cycle_model(-1),
            KeyCode::Right => state.dashboard.playground_mut().cycle_model(1),
            KeyCode::Char('/') | KeyCode::Char('e') => state.focus = Focus::PromptEditor,
            KeyCode::Char(c) => adjust_settings(state, c),
            _ => {}
        },
        Route::Deploy | Route::NotFound => {
            if route == Route::NotFound && code == KeyCode::Enter {
                go_to(state, Route::HOME);
            }
        }
    }
}

fn adjust_settings(state: &mut UiState, key: char) {
    let mut settings = *state.dashboard.playground().settings();
    match key {
        't' => settings.temperature -= 0.1,
        'T' => settings.temperature += 0.1,
        'm' => settings.max_tokens = settings.max_tokens.saturating_sub(256),
        'M' => settings.max_tokens += 256,
        'p' => settings.top_p -= 0.05,
        'P' => settings.top_p += 0.05,
        's' => settings.stream = !settings.stream,
        'l' => settings.log_requests = !settings.log_requests,
        _ => return,
    }
    settings.temperature = (settings.temperature * 10.0).round() / 10.0;
    settings.top_p = (settings.top_p * 100.0).round() / 100.0;
    // Out-of-range values are rejected and the previous settings stay.
    let _ = state.dashboard.playground_mut().update_settings(settings);
}

fn handle_search_key(state: &mut UiState, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => state.focus = Focus::Content,
        _ => {
            if state.search.handle_key(code) {
                *state.dashboard.prompt_query_mut() = state.search.value.clone();
                state.card_index = 0;
            }
        }
    }
}

fn handle_prompt_key(state: &mut UiState, code: KeyCode, tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
    match code {
        KeyCode::Esc | KeyCode::Tab => state.focus = Focus::Content,
        KeyCode::Enter => start_generation(state, tx, rt),
        _ => {
            if state.prompt_input.handle_key(code) {
                state
                    .dashboard
                    .playground_mut()
                    .set_prompt(state.prompt_input.value.clone());
            }
        }
    }
}

fn start_generation(state: &mut UiState, tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
    let playground = state.dashboard.playground();
    if playground.prompt().trim().is_empty() || state.generating.is_some() {
        return;
    }
    let generator = playground.generator();
    let model = playground.selected_model().to_string();
    let prompt = playground.prompt().to_string();
    let settings = *playground.settings();
    if settings.log_requests {
        info!(
            "[PHASE: playground] [STEP: generate] model={} temperature={} max_tokens={} top_p={}",
            model, settings.temperature, settings.max_tokens, settings.top_p
        );
    }

    let tx = tx.clone();
    state.generating = Some(rt.spawn(async move {
        let result = generator.generate(&model, &prompt, &settings).await;
        let _ = tx.send(UiMsg::GenerateFinished { result });
    }));
}

enum WizardAction {
    None,
    Close,
    Submit,
}

fn handle_wizard_key(state: &mut UiState, code: KeyCode, tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
    let action = {
        let UiState {
            dashboard,
            wizard_ui,
            ..
        } = state;
        match (dashboard.wizard_mut(), wizard_ui.as_mut()) {
            (Some(wizard), Some(ui)) => {
                let kind = wizard.kind();
                let step = wizard.state().step_index;
                let fields = step_fields(kind, step);

                if code == KeyCode::Esc {
                    WizardAction::Close
                } else if wizard.phase() == WizardPhase::Submitting {
                    // Only Cancel is live while the strategy runs.
                    match code {
                        KeyCode::Enter if ui.focus == WizardFocus::Button(ButtonFocus::Cancel) => {
                            WizardAction::Close
                        }
                        _ => WizardAction::None,
                    }
                } else {
                    let order = focus_order(kind, step);
                    let pos = order.iter().position(|f| *f == ui.focus).unwrap_or(0);
                    match (code, ui.focus) {
                        (KeyCode::Tab | KeyCode::Down, _) => {
                            commit_file_input(wizard, ui, &fields);
                            ui.focus = order[(pos + 1) % order.len()];
                            WizardAction::None
                        }
                        (KeyCode::BackTab | KeyCode::Up, _) => {
                            commit_file_input(wizard, ui, &fields);
                            ui.focus = order[(pos + order.len() - 1) % order.len()];
                            WizardAction::None
                        }
                        (KeyCode::Enter, WizardFocus::Field(_)) => {
                            commit_file_input(wizard, ui, &fields);
                            ui.focus = order[(pos + 1) % order.len()];
                            WizardAction::None
                        }
                        (_, WizardFocus::Field(idx)) => {
                            if let Some(spec) = fields.get(idx).copied() {
                                edit_field(wizard, ui, spec, code);
                            }
                            WizardAction::None
                        }
                        (KeyCode::Left, WizardFocus::Button(_)) => {
                            ui.focus = order[(pos + order.len() - 1) % order.len()];
                            WizardAction::None
                        }
                        (KeyCode::Right, WizardFocus::Button(_)) => {
                            ui.focus = order[(pos + 1) % order.len()];
                            WizardAction::None
                        }
                        (KeyCode::Enter, WizardFocus::Button(button)) => {
                            press_button(wizard, ui, button)
                        }
                        _ => WizardAction::None,
                    }
                }
            }
            _ => WizardAction::Close,
        }
    };

    match action {
        WizardAction::None => {}
        WizardAction::Close => close_wizard(state),
        WizardAction::Submit => start_submission(state, tx, rt),
    }
}

fn press_button(
    wizard: &mut crate::wizard::WizardController,
    ui: &mut WizardUi,
    button: ButtonFocus,
) -> WizardAction {
    let kind = wizard.kind();
    match button {
        ButtonFocus::Cancel => WizardAction::Close,
        ButtonFocus::Back => {
            if wizard.retreat() {
                ui.error = None;
                ui.focus = first_focus(kind, wizard.state().step_index);
            }
            WizardAction::None
        }
        ButtonFocus::Next => match wizard.step_forward() {
            Ok(StepForward::Moved(step)) => {
                ui.error = None;
                ui.focus = first_focus(kind, step);
                WizardAction::None
            }
            Ok(StepForward::Submit) => WizardAction::Submit,
            Err(e) => {
                ui.error = Some(e.to_string());
                WizardAction::None
            }
        },
    }
}

fn edit_field(
    wizard: &mut crate::wizard::WizardController,
    ui: &mut WizardUi,
    spec: &FieldSpec,
    code: KeyCode,
) {
    let result = match spec.kind {
        FieldKind::Text | FieldKind::Secret => {
            let Some(input) = ui.inputs.get_mut(spec.name) else {
                return;
            };
            let before = input.value.clone();
            input.handle_key(code);
            if input.value == before {
                return;
            }
            wizard.set_field(spec.name, FieldValue::text(input.value.clone()))
        }
        FieldKind::File => {
            if let Some(input) = ui.inputs.get_mut(spec.name) {
                input.handle_key(code);
            }
            return;
        }
        FieldKind::Number {
            min,
            max,
            step,
            default,
        } => {
            let delta = match code {
                KeyCode::Left | KeyCode::Char('-') => -step,
                KeyCode::Right | KeyCode::Char('+') => step,
                _ => return,
            };
            let current = wizard
                .field(spec.name)
                .and_then(FieldValue::as_number)
                .unwrap_or(default);
            let next = (((current + delta - min) / step).round() * step + min).clamp(min, max);
            wizard.set_field(spec.name, FieldValue::Number(next))
        }
        FieldKind::Choice { options } => {
            if options.is_empty() {
                return;
            }
            let delta: isize = match code {
                KeyCode::Left => -1,
                KeyCode::Right | KeyCode::Char(' ') => 1,
                _ => return,
            };
            let len = options.len() as isize;
            let current = wizard
                .field(spec.name)
                .and_then(FieldValue::as_text)
                .and_then(|v| options.iter().position(|o| *o == v));
            let next = match current {
                Some(i) => (i as isize + delta).rem_euclid(len),
                None if delta > 0 => 0,
                None => len - 1,
            };
            wizard.set_field(spec.name, FieldValue::text(options[next as usize]))
        }
        FieldKind::Flag { default } => {
            if !matches!(code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                return;
            }
            let current = wizard
                .field(spec.name)
                .and_then(FieldValue::as_flag)
                .unwrap_or(default);
            wizard.set_field(spec.name, FieldValue::Flag(!current))
        }
    };
    ui.error = result.err().map(|e| e.to_string());
}

/// Resolve the focused file field's path into a file reference.
fn commit_file_input(
    wizard: &mut crate::wizard::WizardController,
    ui: &mut WizardUi,
    fields: &[&'static FieldSpec],
) {
    let WizardFocus::Field(idx) = ui.focus else {
        return;
    };
    let Some(spec) = fields.get(idx) else {
        return;
    };
    if spec.kind != FieldKind::File {
        return;
    }
    let Some(input) = ui.inputs.get(spec.name) else {
        return;
    };
    let path = input.value.trim().to_string();

    let result = if path.is_empty() {
        wizard.clear_field(spec.name)
    } else {
        match FileRef::from_path(Path::new(&path)) {
            Ok(file) => wizard.set_field(spec.name, FieldValue::File(file)),
            Err(e) => {
                ui.error = Some(format!("Cannot read {}: {}", path, e));
                return;
            }
        }
    };
    ui.error = result.err().map(|e| e.to_string());
}

fn start_submission(state: &mut UiState, tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
    let UiState {
        dashboard,
        wizard_ui,
        ..
    } = state;
    let (Some(wizard), Some(ui)) = (dashboard.wizard_mut(), wizard_ui.as_mut()) else {
        return;
    };

    match wizard.begin_submit() {
        Ok(pending) => {
            let submitter = wizard.submitter();
            let correlation_id = pending.correlation_id.clone();
            let payload = pending.payload.clone();
            let tx = tx.clone();
            let task = rt.spawn(async move {
                let result = submitter.submit(&correlation_id, &payload).await;
                let _ = tx.send(UiMsg::SubmitFinished {
                    correlation_id,
                    result,
                });
            });
            ui.error = None;
            ui.focus = WizardFocus::Button(ButtonFocus::Cancel);
            ui.in_flight = Some(InFlight { pending, task });
        }
        Err(e) => ui.error = Some(e.to_string()),
    }
}

fn smoke_dashboard() -> Result<Dashboard> {
    Ok(Dashboard::new(
        Fixtures::builtin(),
        Arc::new(SimulatedSubmitter::new(Duration::ZERO)),
        Arc::new(SimulatedGenerator::new(Duration::ZERO)),
        Duration::from_secs(30),
    )?)
}

/// Seeded screen for a smoke target: a page name, `not-found`, `toast`,
/// `wizard`, `wizard-review`, or `wizard-<kind>`.
fn smoke_state(target: &str) -> Result<UiState> {
    let t = target.trim().to_ascii_lowercase();
    let mut state = UiState::new(smoke_dashboard()?);
    state.focus = Focus::Content;

    if let Some(rest) = t.strip_prefix("wizard") {
        let rest = rest.trim_start_matches('-');
        let kind = match rest {
            "" | "review" => WizardKind::FineTuningProject,
            other => WizardKind::parse(other)
                .ok_or_else(|| anyhow::anyhow!("Unknown smoke target '{}'", target))?,
        };
        if let Some(route) = Route::PAGES
            .into_iter()
            .find(|r| crate::dashboard::page_wizard(*r) == Some(kind))
        {
            go_to(&mut state, route);
        }
        open_wizard(&mut state, kind);

        if rest == "review" {
            if let Some(wizard) = state.dashboard.wizard_mut() {
                wizard.set_field("projectName", FieldValue::text("Support Bot v2"))?;
                wizard.set_field("tags", FieldValue::text("support, chat"))?;
                wizard.set_field("baseModel", FieldValue::text("Llama-3.3-70B"))?;
                while !wizard.state().is_final_step() {
                    wizard.step_forward()?;
                }
            }
            if let Some(ui) = state.wizard_ui.as_mut() {
                ui.focus = WizardFocus::Button(ButtonFocus::Next);
            }
        }
        return Ok(state);
    }

    match t.as_str() {
        "" | "home" => {}
        "not-found" | "404" => go_to(&mut state, Route::NotFound),
        "toast" => {
            go_to(&mut state, Route::FineTuning);
            state.dashboard.activate_project(2);
        }
        "playground" => {
            go_to(&mut state, Route::Playground);
            let prompt = "Write a haiku about GPUs";
            state.prompt_input.set(prompt);
            let playground = state.dashboard.playground_mut();
            playground.set_prompt(prompt);
            let response =
                crate::api::playground::simulated_response(playground.selected_model(), prompt);
            playground.set_response(response);
        }
        other => {
            let route = Route::parse(other)
                .map_err(|_| anyhow::anyhow!("Unknown smoke target '{}'", target))?;
            go_to(&mut state, route);
        }
    }
    Ok(state)
}

/// Render one frame of `target` into an off-screen buffer.
pub fn smoke(target: &str) -> Result<()> {
    info!("[PHASE: tui] [STEP: smoke] target={}", target);
    let state = smoke_state(target)?;
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|f| draw::draw(f.size(), f, &state))?;
    info!("[PHASE: tui] [STEP: smoke] target={} rendered", target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw::draw(f.size(), f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(state: &mut UiState, keys: &[KeyCode], tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
        for key in keys {
            handle_key(state, *key, tx, rt);
        }
    }

    fn type_text(state: &mut UiState, text: &str, tx: &mpsc::Sender<UiMsg>, rt: &Handle) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c), tx, rt);
        }
    }

    #[test]
    fn text_input_edits_by_char() {
        let mut input = TextInput::new("héllo", false);
        input.handle_key(KeyCode::Left);
        input.handle_key(KeyCode::Backspace);
        assert_eq!(input.value, "hélo");
        input.handle_key(KeyCode::Home);
        input.handle_key(KeyCode::Delete);
        assert_eq!(input.value, "élo");
        input.handle_key(KeyCode::Char('ü'));
        assert_eq!(input.value, "üélo");

        let secret = TextInput::new("abc", true);
        assert_eq!(secret.display(), "***");
    }

    #[test]
    fn every_smoke_target_renders() {
        for target in [
            "", "rag", "fine-tuning", "models", "prompts", "deploy", "playground", "not-found",
            "toast", "wizard", "wizard-review", "wizard-project", "wizard-rag",
            "wizard-model", "wizard-prompt", "wizard-deployment",
        ] {
            smoke(target).unwrap_or_else(|e| panic!("{}: {}", target, e));
        }
        assert!(smoke("billing").is_err());
        assert!(smoke("wizard-billing").is_err());
    }

    #[test]
    fn pages_show_their_fixtures() {
        let screen = render(&smoke_state("deploy").unwrap());
        assert!(screen.contains("FineTunAI"));
        assert!(screen.contains("Deploy"));

        let screen = render(&smoke_state("not-found").unwrap());
        assert!(screen.contains("Oops! Page not found"));

        let screen = render(&smoke_state("toast").unwrap());
        assert!(screen.contains("Opening in Playground"));
    }

    #[test]
    fn wizard_modal_shows_step_and_buttons() {
        let screen = render(&smoke_state("wizard").unwrap());
        assert!(screen.contains("Step 1 of 5"));
        assert!(screen.contains("[ Back ]"));
        assert!(screen.contains("[ Next ]"));
        assert!(screen.contains("[ Cancel ]"));

        let screen = render(&smoke_state("wizard-review").unwrap());
        assert!(screen.contains("Support Bot v2"));
        assert!(screen.contains("Start Fine-Tuning") || screen.contains("Step 5 of 5"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn keyboard_drives_prompt_wizard_to_submission() {
        let rt = Handle::current();
        let (tx, rx) = mpsc::channel();
        let mut state = UiState::new(smoke_dashboard().unwrap());

        press(&mut state, &[KeyCode::Char('4'), KeyCode::Char('n')], &tx, &rt);
        assert_eq!(state.dashboard.route(), Route::Prompts);
        assert!(state.wizard_ui.is_some());

        type_text(&mut state, "Greeter", &tx, &rt);
        assert_eq!(
            state
                .dashboard
                .wizard()
                .unwrap()
                .field("promptName")
                .and_then(FieldValue::as_text),
            Some("Greeter")
        );

        // Walk to the final step through the Next button.
        let total = WizardKind::Prompt.total_steps();
        for _ in 1..total {
            if let Some(ui) = state.wizard_ui.as_mut() {
                ui.focus = WizardFocus::Button(ButtonFocus::Next);
            }
            press(&mut state, &[KeyCode::Enter], &tx, &rt);
        }
        assert!(state.dashboard.wizard().unwrap().state().is_final_step());

        if let Some(ui) = state.wizard_ui.as_mut() {
            ui.focus = WizardFocus::Button(ButtonFocus::Next);
        }
        press(&mut state, &[KeyCode::Enter], &tx, &rt);
        assert_eq!(
            state.dashboard.wizard().unwrap().phase(),
            WizardPhase::Submitting
        );

        let msg = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)).map(|m| (m, rx)))
            .await
            .unwrap();
        let (msg, rx) = msg.unwrap();
        if let UiMsg::SubmitFinished {
            correlation_id,
            result,
        } = msg
        {
            finish_submission(&mut state, &correlation_id, result);
        } else {
            panic!("unexpected message");
        }
        drain_messages(&mut state, &rx);

        assert!(state.wizard_ui.is_none());
        assert!(state.dashboard.wizard().is_none());
        let toasts = state.dashboard.toasts().snapshot();
        assert_eq!(toasts.len(), 1);
        assert!(!toasts[0].is_destructive());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn escape_during_submission_drops_the_result() {
        let rt = Handle::current();
        let (tx, _rx) = mpsc::channel();
        let mut state = UiState::new(smoke_dashboard().unwrap());
        go_to(&mut state, Route::Prompts);
        open_wizard(&mut state, WizardKind::Prompt);
        {
            let wizard = state.dashboard.wizard_mut().unwrap();
            while !wizard.state().is_final_step() {
                wizard.step_forward().unwrap();
            }
        }
        start_submission(&mut state, &tx, &rt);
        let correlation_id = state
            .wizard_ui
            .as_ref()
            .and_then(|ui| ui.in_flight.as_ref())
            .map(|f| f.pending.correlation_id.clone())
            .unwrap();

        press(&mut state, &[KeyCode::Esc], &tx, &rt);
        assert!(state.wizard_ui.is_none());

        finish_submission(&mut state, &correlation_id, Ok(()));
        assert!(state.dashboard.toasts().snapshot().is_empty());
    }

    #[test]
    fn category_tabs_follow_arrow_keys() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut state = UiState::new(smoke_dashboard().unwrap());
        state.focus = Focus::Content;

        press(&mut state, &[KeyCode::Right], &tx, rt.handle());
        assert_eq!(state.dashboard.rag_tabs().active_index(), 1);
        press(&mut state, &[KeyCode::Left, KeyCode::Left], &tx, rt.handle());
        assert_eq!(
            state.dashboard.rag_tabs().active_index(),
            state.dashboard.rag_tabs().tabs().len() - 1
        );
    }

    #[test]
    fn prompt_search_filters_as_you_type() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut state = UiState::new(smoke_dashboard().unwrap());
        go_to(&mut state, Route::Prompts);
        state.focus = Focus::Content;

        press(&mut state, &[KeyCode::Char('/')], &tx, rt.handle());
        type_text(&mut state, "code", &tx, rt.handle());
        assert_eq!(state.dashboard.visible_prompts().len(), 1);
        press(&mut state, &[KeyCode::Esc], &tx, rt.handle());
        assert_eq!(state.focus, Focus::Content);
    }

    #[test]
    fn quit_asks_for_confirmation() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut state = UiState::new(smoke_dashboard().unwrap());

        press(&mut state, &[KeyCode::Char('q')], &tx, rt.handle());
        assert!(state.modal.is_some());
        press(&mut state, &[KeyCode::Esc], &tx, rt.handle());
        assert!(!state.quit);
        press(&mut state, &[KeyCode::Char('q'), KeyCode::Char('y')], &tx, rt.handle());
        assert!(state.quit);
    }

    #[test]
    fn number_fields_step_and_clamp() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut state = UiState::new(smoke_dashboard().unwrap());
        open_wizard(&mut state, WizardKind::FineTuningProject);
        {
            let wizard = state.dashboard.wizard_mut().unwrap();
            for _ in 1..4 {
                wizard.step_forward().unwrap();
            }
        }
        // Epochs is the first field on the hyperparameter step.
        press(&mut state, &[KeyCode::Right], &tx, rt.handle());
        let epochs = state
            .dashboard
            .wizard()
            .unwrap()
            .field("epochs")
            .and_then(FieldValue::as_number)
            .unwrap();
        assert!(epochs > 0.0);
        for _ in 0..200 {
            press(&mut state, &[KeyCode::Left], &tx, rt.handle());
        }
        let FieldKind::Number { min, .. } = crate::wizard::catalog::EPOCHS else {
            unreachable!()
        };
        assert_eq!(
            state
                .dashboard
                .wizard()
                .unwrap()
                .field("epochs")
                .and_then(FieldValue::as_number),
            Some(min)
        );
    }
}
