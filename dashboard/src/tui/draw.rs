// Rendering for the terminal dashboard. Pure functions of `UiState`.

use super::{ButtonFocus, Focus, Modal, UiState, WizardFocus, WizardUi};
use crate::dashboard::page_action_label;
use crate::filter::CategoryTabs;
use crate::models::fixtures::StatCard;
use crate::routes::Route;
use crate::wizard::{FieldKind, FieldSpec, FieldValue, WizardController, WizardPhase};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const TOAST_WIDTH: u16 = 44;

pub(super) fn draw(area: Rect, f: &mut Frame<'_>, state: &UiState) {
    let window_area = centered_window(area, 100, 30);
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" FineTunAI ");
    f.render_widget(outer, window_area);

    let inner = window_area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(inner);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(20)].as_ref())
        .split(rows[0]);

    draw_sidebar(f, cols[0], state);
    draw_page(f, cols[1], state);
    draw_hints(f, rows[1], state);

    if let (Some(wizard), Some(ui)) = (state.dashboard.wizard(), state.wizard_ui.as_ref()) {
        draw_wizard(f, window_area, wizard, ui);
    }
    draw_toasts(f, window_area, state);
    if let Some(Modal::ConfirmQuit { yes_focused }) = state.modal {
        draw_quit_modal(f, window_area, yes_focused);
    }
}

fn centered_window(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn button_text(label: &str, focused: bool, enabled: bool) -> Span<'static> {
    let text = format!("[ {} ]", label);
    if !enabled {
        Span::styled(text, Style::default().fg(Color::DarkGray))
    } else if focused {
        Span::styled(text, Style::default().add_modifier(Modifier::REVERSED))
    } else {
        Span::raw(text)
    }
}

fn selected(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn draw_sidebar(f: &mut Frame<'_>, area: Rect, state: &UiState) {
    let current = state.dashboard.route();
    let lines: Vec<Line> = Route::PAGES
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let marker = if *route == current { ">" } else { " " };
            let text = format!("{} {} {}", marker, i + 1, route.label());
            let focused = state.focus == Focus::Sidebar
                && state.wizard_ui.is_none()
                && i == state.sidebar_index;
            Line::from(Span::styled(text, selected(focused)))
        })
        .collect();

    let block = Block::default().borders(Borders::RIGHT);
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn draw_hints(f: &mut Frame<'_>, area: Rect, state: &UiState) {
    let hint = if state.wizard_ui.is_some() {
        "Tab/Shift-Tab move  Left/Right change  Space toggle  Enter select  Esc cancel"
    } else {
        match state.focus {
            Focus::Sidebar => "Up/Down choose page  Enter open  1-6 jump  x clear toasts  q quit",
            Focus::Search => "Type to search  Esc done",
            Focus::PromptEditor => "Type a prompt  Enter generate  Esc done",
            Focus::Content => match state.dashboard.route() {
                Route::Rag => "Left/Right tabs  Up/Down cards  Enter build pipeline  n new  Tab sidebar",
                Route::FineTuning => "Up/Down projects  Enter open  n new project  Tab sidebar",
                Route::Models => "Left/Right tabs  Enter playground  f fine-tune  n new  Tab sidebar",
                Route::Prompts => "/ search  n new prompt  Tab sidebar",
                Route::Deploy => "Up/Down deployments  n new deployment  Tab sidebar",
                Route::Playground => "Left/Right model  e edit prompt  t/T m/M p/P settings  s stream  l log",
                Route::NotFound => "Enter return home  Tab sidebar",
            },
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_page(f: &mut Frame<'_>, area: Rect, state: &UiState) {
    let area = area.inner(&Margin {
        vertical: 0,
        horizontal: 1,
    });
    let route = state.dashboard.route();
    let mut lines: Vec<Line> = Vec::new();

    if route != Route::NotFound {
        let mut header = vec![Span::styled(
            route.heading().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(label) = page_action_label(route) {
            header.push(Span::raw("   "));
            header.push(button_text(label, false, true));
            header.push(Span::styled(" (n)", Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(header));
        lines.push(Line::from(Span::styled(
            route.subtitle().to_string(),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    let content_focused = state.focus == Focus::Content && state.wizard_ui.is_none();
    let card = |i: usize| content_focused && i == state.card_index;

    match route {
        Route::Rag => {
            lines.push(tab_line(state.dashboard.rag_tabs()));
            lines.push(Line::from(""));
            for (i, m) in state.dashboard.visible_rag_models().iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("{:<40} {}", m.title, m.category),
                    selected(card(i)),
                )));
            }
        }
        Route::FineTuning => {
            lines.push(stat_line(&state.dashboard.fixtures().fine_tuning_stats));
            lines.push(Line::from(""));
            for (i, p) in state.dashboard.fixtures().projects.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{:<22} {:<16} {:<10} {} {:>3}%  {}",
                        p.name,
                        p.model,
                        p.status.as_str(),
                        progress_bar(p.progress, 10),
                        p.progress,
                        p.last_updated
                    ),
                    selected(card(i)),
                )));
            }
        }
        Route::Models => {
            lines.push(tab_line(state.dashboard.model_tabs()));
            lines.push(Line::from(""));
            for (i, m) in state.dashboard.visible_models().iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("{:<40} {:<11} {}", m.title, m.category, m.status),
                    selected(card(i)),
                )));
            }
        }
        Route::Prompts => {
            let cursor = if state.focus == Focus::Search { "_" } else { "" };
            lines.push(Line::from(format!(
                "Search: {}{}",
                state.search.display(),
                cursor
            )));
            lines.push(Line::from(""));
            let visible = state.dashboard.visible_prompts();
            if visible.is_empty() {
                lines.push(Line::from("No prompt collections match your search."));
            }
            for (i, c) in visible.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("{} ({} prompts)", c.title, c.count),
                    selected(card(i)).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", c.description),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        Route::Deploy => {
            lines.push(stat_line(&state.dashboard.fixtures().deployment_stats));
            lines.push(Line::from(""));
            for (i, d) in state.dashboard.fixtures().deployments.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{:<20} {:<24} {:<8} {:<8} {:<8} {}",
                        d.name, d.model, d.status, d.kind, d.requests, d.last_deployed
                    ),
                    selected(card(i)),
                )));
            }
        }
        Route::Playground => playground_lines(state, &mut lines),
        Route::NotFound => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "404",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from("Oops! Page not found"));
            lines.push(Line::from(""));
            lines.push(Line::from(button_text("Return to Home", content_focused, true)));
        }
    }

    let alignment = if route == Route::NotFound {
        Alignment::Center
    } else {
        Alignment::Left
    };
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(alignment)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn tab_line(tabs: &CategoryTabs) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, tab) in tabs.tabs().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} ", tab.label),
            selected(i == tabs.active_index()),
        ));
    }
    Line::from(spans)
}

fn stat_line(stats: &[StatCard]) -> Line<'static> {
    let spans: Vec<Span> = stats
        .iter()
        .flat_map(|s| {
            [
                Span::styled(
                    format!("{}: ", s.title),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(s.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("   "),
            ]
        })
        .collect();
    Line::from(spans)
}

fn playground_lines(state: &UiState, lines: &mut Vec<Line<'static>>) {
    let playground = state.dashboard.playground();
    let model = playground.selected_model();
    let detail = state
        .dashboard
        .fixtures()
        .playground_models
        .iter()
        .find(|m| m.name == model)
        .map(|m| {
            if m.fine_tuned {
                format!("{}, fine-tuned", m.category)
            } else {
                m.category.clone()
            }
        })
        .unwrap_or_default();
    lines.push(Line::from(format!("Model: < {} >  {}", model, detail)));

    let editing = state.focus == Focus::PromptEditor && state.wizard_ui.is_none();
    let prompt = if playground.prompt().is_empty() && !editing {
        Span::styled(
            "Enter your prompt here...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(format!(
            "{}{}",
            state.prompt_input.display(),
            if editing { "_" } else { "" }
        ))
    };
    lines.push(Line::from(vec![Span::raw("Prompt: "), prompt]));

    let s = playground.settings();
    lines.push(Line::from(Span::styled(
        format!(
            "Temperature {:.1}  Max tokens {}  Top P {:.2}  Stream {}  Log requests {}",
            s.temperature,
            s.max_tokens,
            s.top_p,
            if s.stream { "on" } else { "off" },
            if s.log_requests { "on" } else { "off" }
        ),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Response",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if state.generating.is_some() {
        lines.push(Line::from("Generating..."));
    } else {
        match playground.response() {
            Some(text) => lines.extend(text.lines().map(|l| Line::from(l.to_string()))),
            None => lines.push(Line::from(Span::styled(
                "Run a prompt to see the model's response.",
                Style::default().fg(Color::DarkGray),
            ))),
        }
    }
}

fn field_value_text(wizard: &WizardController, ui: &WizardUi, spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::Text | FieldKind::Secret => ui
            .inputs
            .get(spec.name)
            .map(|i| i.display())
            .unwrap_or_default(),
        FieldKind::File => {
            let path = ui
                .inputs
                .get(spec.name)
                .map(|i| i.display())
                .unwrap_or_default();
            match wizard.field(spec.name).and_then(FieldValue::as_file) {
                Some(file) => format!("{}  ({}, {})", path, file.name, file.display_size()),
                None => path,
            }
        }
        FieldKind::Number { min, max, default, .. } => {
            let value = wizard
                .field(spec.name)
                .and_then(FieldValue::as_number)
                .unwrap_or(default);
            format!("< {} >  ({} to {})", value, min, max)
        }
        FieldKind::Choice { .. } => {
            let value = wizard
                .field(spec.name)
                .and_then(FieldValue::as_text)
                .unwrap_or("");
            if value.is_empty() {
                "< choose >".to_string()
            } else {
                format!("< {} >", value)
            }
        }
        FieldKind::Flag { default } => {
            let on = wizard
                .field(spec.name)
                .and_then(FieldValue::as_flag)
                .unwrap_or(default);
            let mark = if on { "[x]" } else { "[ ]" };
            mark.to_string()
        }
    }
}

/// Review summary: every field with a value, secrets masked.
fn review_lines(wizard: &WizardController) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for spec in wizard.kind().fields() {
        let Some(value) = wizard.field(spec.name).filter(|v| v.is_present()) else {
            continue;
        };
        let shown = if spec.is_secret() {
            "********".to_string()
        } else {
            value.to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", spec.label),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(shown),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from("Defaults will be used for every setting."));
    }
    lines
}

fn draw_wizard(f: &mut Frame<'_>, window: Rect, wizard: &WizardController, ui: &WizardUi) {
    let area = centered_window(window, 80, 22);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", wizard.kind().title()));
    f.render_widget(block, area);

    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(inner);

    let state = wizard.state();
    let submitting = wizard.phase() == WizardPhase::Submitting;
    let filled = state.step_index * 20 / state.total_steps.max(1);
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Step {} of {}: {}",
                state.step_index,
                state.total_steps,
                wizard.step_title()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{}{}", "=".repeat(filled), "-".repeat(20 - filled))),
        Line::from(""),
    ];

    let fields: Vec<&FieldSpec> = wizard.kind().fields_for_step(state.step_index).collect();
    if fields.is_empty() && wizard.kind().has_review_step() && state.is_final_step() {
        lines.extend(review_lines(wizard));
    }
    for (i, spec) in fields.iter().enumerate() {
        let focused = ui.focus == WizardFocus::Field(i) && !submitting;
        let marker = if focused { ">" } else { " " };
        let mut value = field_value_text(wizard, ui, spec);
        let placeholder = value.is_empty() && !spec.placeholder.is_empty();
        if placeholder {
            value = spec.placeholder.to_string();
        }
        let required = if spec.required { " *" } else { "" };
        lines.push(Line::from(vec![
            Span::raw(format!("{} {}{}: ", marker, spec.label, required)),
            Span::styled(
                value,
                if placeholder {
                    Style::default().fg(Color::DarkGray)
                } else if focused {
                    Style::default().add_modifier(Modifier::UNDERLINED)
                } else {
                    Style::default()
                },
            ),
        ]));
    }

    if submitting {
        lines.push(Line::from(""));
        lines.push(Line::from("Submitting..."));
    }
    if let Some(err) = ui.error.as_ref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red),
        )));
    }
    f.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }),
        rows[0],
    );

    let is_focused = |b: ButtonFocus| ui.focus == WizardFocus::Button(b);
    let buttons = Line::from(vec![
        button_text(
            "Back",
            is_focused(ButtonFocus::Back),
            wizard.can_go_back() && !submitting,
        ),
        Span::raw(" "),
        button_text(
            wizard.primary_label(),
            is_focused(ButtonFocus::Next),
            !submitting,
        ),
        Span::raw(" "),
        button_text("Cancel", is_focused(ButtonFocus::Cancel), true),
    ]);
    f.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Right),
        rows[1],
    );
}

fn draw_toasts(f: &mut Frame<'_>, window: Rect, state: &UiState) {
    let width = TOAST_WIDTH.min(window.width.saturating_sub(2));
    let mut y = window.y + 1;
    for toast in state.dashboard.toasts().active() {
        let height = 4;
        if y + height > window.y + window.height {
            break;
        }
        let area = Rect {
            x: window.x + window.width.saturating_sub(width + 1),
            y,
            width,
            height,
        };
        let color = if toast.is_destructive() {
            Color::Red
        } else {
            Color::Green
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                toast.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(toast.description.clone())
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
        y += height;
    }
}

fn draw_quit_modal(f: &mut Frame<'_>, window: Rect, yes_focused: bool) {
    let area = centered_window(window, 44, 7);
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::from("Quit FineTunAI?"),
        Line::from(""),
        Line::from(vec![
            button_text("Yes", yes_focused, true),
            Span::raw("  "),
            button_text("No", !yes_focused, true),
        ]),
    ];
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Confirm ")),
        area,
    );
}
