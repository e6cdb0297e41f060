use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::clock;
use crate::cmd_status::{action_label, remaining_line};
use crate::tui::app::App;
use fastlog_core::{DecoratedEvent, Phase, Progress, SuccessState};
use fastlog_store::LogStorage;

/// Render the full TUI frame.
pub fn render<S: LogStorage>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // phase header
            Constraint::Length(3), // gauge
            Constraint::Length(3), // remaining / last / goal
            Constraint::Min(5),    // history
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let progress = app.progress();
    render_header(f, app, chunks[0]);
    render_gauge(f, progress.as_ref(), chunks[1]);
    render_times(f, progress.as_ref(), chunks[2]);
    render_history(f, &app.history, chunks[3]);
    render_status_bar(f, app, chunks[4]);
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Fasting => Color::Cyan,
        Phase::Eating => Color::Yellow,
    }
}

fn render_header<S: LogStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let snap = app.session.snapshot();
    let next = snap
        .target
        .map(|t| t.start)
        .unwrap_or(Phase::Fasting);
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", snap.state),
            Style::default()
                .fg(phase_color(snap.state))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [l] {}", action_label(next))),
    ]);
    let block = Block::default().title(" fastlog ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_gauge(f: &mut Frame, progress: Option<&Progress>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let Some(p) = progress else {
        f.render_widget(Paragraph::new(" no target yet").block(block), area);
        return;
    };
    let color = if p.overrun { Color::Green } else { phase_color(p.phase) };
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color))
        .percent(p.percent.clamp(0, 100) as u16)
        .label(format!("{:.2} hours left", p.ms_remaining as f64 / fastlog_core::HOUR_MS as f64));
    f.render_widget(gauge, area);
}

fn render_times(f: &mut Frame, progress: Option<&Progress>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let text = match progress {
        Some(p) => format!(
            " {}   Last: {}   Goal: {}",
            remaining_line(p),
            clock::short(p.phase_started_at()),
            clock::short(p.target.ts)
        ),
        None => " Log an event to start tracking".to_string(),
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn history_style(state: SuccessState) -> Style {
    match state {
        SuccessState::Success => Style::default().fg(Color::Green),
        SuccessState::Failure => Style::default().fg(Color::Red),
        SuccessState::None => Style::default(),
    }
}

fn render_history(f: &mut Frame, history: &[DecoratedEvent], area: Rect) {
    let title = format!(" History ({}) ", history.len());
    let block = Block::default().title(title).borders(Borders::ALL);
    let items: Vec<ListItem> = history
        .iter()
        .map(|d| {
            let line = format!(
                " {} {}  [{}] Started {}",
                d.success_state.marker(),
                clock::short(d.event.ts),
                clock::span_short(d.duration),
                d.event.start
            );
            ListItem::new(Line::from(Span::styled(
                line,
                history_style(d.success_state),
            )))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_status_bar<S: LogStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let (text, style) = if let Some(err) = &app.error {
        (
            format!(" ERROR: {err}"),
            Style::default().fg(Color::White).bg(Color::Red),
        )
    } else if app.confirming {
        (
            " There is still time left. Are you sure? y:confirm  any key:cancel".to_string(),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else {
        let msg = app
            .message
            .as_deref()
            .map(|m| format!("{m} | "))
            .unwrap_or_default();
        (
            format!(" {msg}l:log  r:reload  q:quit"),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    };
    let bar = Paragraph::new(Line::from(Span::styled(text, style)));
    f.render_widget(bar, area);
}
