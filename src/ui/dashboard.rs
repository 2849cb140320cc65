//! Dashboard screen rendering.

use crate::clipboard::Clipboard;
use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::controller::{CopyMarker, DashboardSnapshot};
use crate::environment::Environment;
use crate::events::{Event as WorkerEvent, EventType, Worker};
use crate::proxy::{CopyFormat, ProxyRecord, ProxyStatus};
use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::collections::VecDeque;
use std::time::Instant;

/// Frames of the loading spinner, advanced once per UI tick.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Terminal rows one proxy card occupies, border included.
const CARD_HEIGHT: u16 = 9;

/// State for the dashboard screen: the latest record snapshot plus
/// everything that is purely presentational (selection, copy marker,
/// activity log, animation tick).
pub struct DashboardState {
    /// Identity the records belong to, if signed in.
    pub user: Option<String>,

    /// The environment in which the application is running.
    pub environment: Environment,

    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,

    /// Records from the last successful refresh.
    pub records: Vec<ProxyRecord>,

    /// Whether a refresh is currently in flight.
    pub loading: bool,

    /// User-facing error from the last failed refresh, if any.
    pub error: Option<&'static str>,

    /// When the records were last successfully refreshed.
    pub last_updated: Option<DateTime<Local>>,

    /// Index of the selected card.
    pub selected: usize,

    /// Transient copied-field acknowledgment.
    pub copy_marker: CopyMarker,

    /// A queue of events received from the refresh worker.
    pub events: VecDeque<WorkerEvent>,

    /// Animation tick counter.
    pub tick: usize,

    /// Whether to paint the dashboard background.
    pub with_background_color: bool,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(user: Option<String>, environment: Environment, with_background_color: bool) -> Self {
        Self {
            user,
            environment,
            start_time: Instant::now(),
            records: Vec::new(),
            loading: true,
            error: None,
            last_updated: None,
            selected: 0,
            copy_marker: CopyMarker::default(),
            events: VecDeque::new(),
            tick: 0,
            with_background_color,
        }
    }

    /// Replaces the displayed state with a fresh controller snapshot.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.records = snapshot.records;
        self.loading = snapshot.loading;
        self.error = snapshot.error;
        self.last_updated = snapshot.last_updated;
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
    }

    /// Add an event to the activity log with size limit
    pub fn add_event(&mut self, event: WorkerEvent) {
        if self.events.len() >= MAX_ACTIVITY_LOGS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Per-frame housekeeping.
    pub fn update(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.copy_marker.clear_expired();
    }

    pub fn select_next(&mut self) {
        if !self.records.is_empty() {
            self.selected = (self.selected + 1).min(self.records.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Copies the requested format of the selected record and marks the
    /// field. A missing or failing clipboard does not disturb the view;
    /// the marker is set either way.
    pub fn copy_selected(
        &mut self,
        format: CopyFormat,
        clipboard: Option<&mut (dyn Clipboard + 'static)>,
    ) -> Option<WorkerEvent> {
        let record = self.records.get(self.selected)?;
        let text = record.copy_text(format);
        let key = record.field_key(format);

        if let Some(clipboard) = clipboard {
            if let Err(e) = clipboard.write_text(&text) {
                log::debug!("Clipboard write failed: {}", e);
            }
        }

        self.copy_marker.set(key);
        Some(WorkerEvent::clipboard(format!(
            "Copied {} of proxy {}",
            format.slug(),
            record.id
        )))
    }

    /// Get a ratatui color for a worker based on its type
    fn get_worker_color(worker: &Worker) -> Color {
        match worker {
            Worker::Refresher => Color::Cyan,
            Worker::Clipboard => Color::Green,
            Worker::Session => Color::Magenta,
        }
    }

    /// Format timestamp to include date but no year (MM-DD HH:MM:SS)
    fn format_compact_timestamp(timestamp: &str) -> String {
        // Extract from "YYYY-MM-DD HH:MM:SS" format to "MM-DD HH:MM:SS"
        if let Some(date_time) = timestamp.split_once(' ') {
            let date_part = date_time.0; // "YYYY-MM-DD"
            let time_part = date_time.1; // "HH:MM:SS"

            if let Some(month_day) = date_part.get(5..) {
                // Skip "YYYY-"
                format!("{} {}", month_day, time_part)
            } else {
                timestamp.to_string()
            }
        } else {
            timestamp.to_string()
        }
    }
}

fn status_color(status: ProxyStatus) -> Color {
    match status {
        ProxyStatus::Active => Color::Green,
        ProxyStatus::Expired => Color::Red,
        ProxyStatus::Unknown => Color::DarkGray,
    }
}

/// Render the dashboard screen.
pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        let background_block = Block::default().style(Style::default().bg(Color::Rgb(18, 18, 24)));
        f.render_widget(background_block, f.area());
    }

    let error_rows = if state.error.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),          // Title block
                Constraint::Length(1),          // Status line
                Constraint::Length(error_rows), // Error banner
                Constraint::Min(0),             // Cards area
                Constraint::Length(8),          // Activity log
                Constraint::Length(2),          // Footer block
            ]
            .as_ref(),
        )
        .split(f.area());

    render_title(f, chunks[0]);
    render_status_line(f, chunks[1], state);
    if let Some(error) = state.error {
        let banner = Paragraph::new(format!("  {}", error))
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
        f.render_widget(banner, chunks[2]);
    }
    render_cards(f, chunks[3], state);
    render_logs(f, chunks[4], state);
    render_footer(f, chunks[5], state);
}

fn render_title(f: &mut Frame, area: Rect) {
    let version = env!("CARGO_PKG_VERSION");
    let title_block = Block::default().borders(Borders::BOTTOM);
    let title = Paragraph::new(format!("=== PROXY DASHBOARD v{} ===", version))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(title_block);
    f.render_widget(title, area);
}

fn render_status_line(f: &mut Frame, area: Rect, state: &DashboardState) {
    let user_text = state.user.as_deref().unwrap_or("not signed in");
    let last_updated = state
        .last_updated
        .map(|ts| ts.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let uptime = state.start_time.elapsed();
    let uptime_string = format!(
        "{}h {}m {}s",
        uptime.as_secs() / 3600,
        (uptime.as_secs() % 3600) / 60,
        uptime.as_secs() % 60
    );

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("USER: ", Style::default().fg(Color::DarkGray)),
        Span::styled(user_text.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled("  ENV: ", Style::default().fg(Color::DarkGray)),
        Span::styled(state.environment.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled("  UPDATED: ", Style::default().fg(Color::DarkGray)),
        Span::styled(last_updated, Style::default().fg(Color::Cyan)),
        Span::styled("  UPTIME: ", Style::default().fg(Color::DarkGray)),
        Span::styled(uptime_string, Style::default().fg(Color::Cyan)),
    ];

    if state.loading {
        let frame = SPINNER_FRAMES[state.tick % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!("  {} refreshing", frame),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_cards(f: &mut Frame, area: Rect, state: &DashboardState) {
    if state.records.is_empty() {
        let message = if state.loading {
            let frame = SPINNER_FRAMES[state.tick % SPINNER_FRAMES.len()];
            format!("{} Loading proxies...", frame)
        } else {
            "No proxies found for your account.".to_string()
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::NONE));
        let centered = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(area.height.saturating_sub(1) / 2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        f.render_widget(empty, centered[1]);
        return;
    }

    // Two-column grid, paged around the selection.
    let rows_fit = (area.height / CARD_HEIGHT).max(1) as usize;
    let per_page = rows_fit * 2;
    let page = state.selected / per_page;
    let start = page * per_page;
    let visible = &state.records[start..state.records.len().min(start + per_page)];

    let row_constraints: Vec<Constraint> = (0..rows_fit)
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (i, record) in visible.iter().enumerate() {
        let row_area = rows[i / 2];
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row_area);
        let card_area = cols[i % 2];
        let selected = start + i == state.selected;
        render_card(f, card_area, record, selected, state);
    }
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    record: &ProxyRecord,
    selected: bool,
    state: &DashboardState,
) {
    let border_color = if selected {
        Color::Yellow
    } else {
        status_color(record.status)
    };

    let title = match &record.name {
        Some(name) => format!(" {} ", name),
        None => format!(" Proxy #{} ", record.id),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let field_line = |label: &str, value: String, format: CopyFormat| {
        let mut spans = vec![
            Span::styled(format!(" {:<9}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ];
        if state.copy_marker.active() == Some(record.field_key(format).as_str()) {
            spans.push(Span::styled(
                "  ✓ copied",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    };

    let mut lines = vec![
        field_line("IP", record.ip.clone(), CopyFormat::Ip),
        field_line("PORT", record.port.to_string(), CopyFormat::Port),
        field_line("USER", record.username.clone(), CopyFormat::Username),
        field_line("PASS", record.password.clone(), CopyFormat::Password),
        Line::from(vec![
            Span::styled(" STATUS   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                record.status.to_string().to_uppercase(),
                Style::default()
                    .fg(status_color(record.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" EXPIRES  ", Style::default().fg(Color::DarkGray)),
            Span::raw(
                record
                    .expires_at
                    .with_timezone(&Local)
                    .format("%b %d, %Y %H:%M")
                    .to_string(),
            ),
        ]),
    ];

    if let Some(order) = &record.order {
        lines.push(Line::from(vec![
            Span::styled(" ORDER    ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("#{}", order)),
        ]));
    }

    let card = Paragraph::new(lines).block(block);
    f.render_widget(card, area);
}

fn render_logs(f: &mut Frame, area: Rect, state: &DashboardState) {
    let log_lines: Vec<Line> = state
        .events
        .iter()
        .filter(|event| event.should_display())
        .rev() // newest first
        .map(|event| {
            let main_icon = match (event.event_type, event.log_level) {
                (EventType::Success, _) => "✅",
                (EventType::Error, crate::error_classifier::LogLevel::Error) => "❌",
                (EventType::Error, crate::error_classifier::LogLevel::Warn) => "⚠️",
                (EventType::Error, _) => "❌",
                (EventType::Refresh, _) => "🔄",
                (EventType::Waiting, _) => "⏳",
                (EventType::Shutdown, _) => "🔴",
            };

            let worker_type = match event.worker {
                Worker::Refresher => "Refresher",
                Worker::Clipboard => "Clipboard",
                Worker::Session => "Session",
            };

            let worker_color = DashboardState::get_worker_color(&event.worker);
            let compact_time = DashboardState::format_compact_timestamp(&event.timestamp);

            Line::from(vec![
                Span::raw(format!("{} ", main_icon)),
                Span::styled(
                    format!("{} ", compact_time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("[{}] ", worker_type),
                    Style::default()
                        .fg(worker_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(event.msg.clone(), Style::default().fg(worker_color)),
            ])
        })
        .collect();

    let log_paragraph = if log_lines.is_empty() {
        Paragraph::new(vec![Line::from("Starting...")])
    } else {
        Paragraph::new(log_lines)
    };

    let log_widget = log_paragraph
        .block(
            Block::default().title("LOGS").borders(Borders::TOP).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(log_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut footer_text =
        "[Q] Quit | [R] Refresh | [↑/↓] Select | Copy: [I]p [P]ort [U]ser Pass[W] [F]ull [A]uth"
            .to_string();
    if let Some(key) = state.copy_marker.active() {
        footer_text.push_str(&format!(" | ✓ Copied {}", key));
    }

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardError, MockClipboard};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn record(id: u64) -> ProxyRecord {
        ProxyRecord {
            id,
            name: None,
            order: None,
            ip: "1.2.3.4".to_string(),
            port: 8080,
            username: "u".to_string(),
            password: "p".to_string(),
            status: ProxyStatus::Active,
            expires_at: Utc::now(),
        }
    }

    fn state_with_records(records: Vec<ProxyRecord>) -> DashboardState {
        let mut state = DashboardState::new(
            Some("user@example.com".to_string()),
            Environment::Local,
            false,
        );
        state.apply_snapshot(DashboardSnapshot {
            records,
            loading: false,
            error: None,
            last_updated: None,
        });
        state
    }

    #[test]
    /// Copying writes the formatted text and marks the field key.
    fn copy_selected_writes_formatted_text() {
        let mut state = state_with_records(vec![record(7)]);

        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_write_text()
            .with(eq("u:p@1.2.3.4:8080"))
            .times(1)
            .returning(|_| Ok(()));

        let event = state.copy_selected(CopyFormat::Auth, Some(&mut clipboard));

        assert!(event.is_some());
        assert_eq!(state.copy_marker.active(), Some("auth-7"));
    }

    #[test]
    /// A clipboard failure is invisible: the marker is still set.
    fn copy_selected_ignores_clipboard_failure() {
        let mut state = state_with_records(vec![record(7)]);

        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_write_text()
            .returning(|_| Err(ClipboardError::Write("denied".to_string())));

        let event = state.copy_selected(CopyFormat::Ip, Some(&mut clipboard));

        assert!(event.is_some());
        assert_eq!(state.copy_marker.active(), Some("ip-7"));
    }

    #[test]
    /// Copying with no records does nothing.
    fn copy_selected_without_records_is_a_noop() {
        let mut state = state_with_records(vec![]);
        let event = state.copy_selected(CopyFormat::Colon, None);
        assert!(event.is_none());
        assert_eq!(state.copy_marker.active(), None);
    }

    #[test]
    /// Applying a snapshot clamps the selection into the new record set.
    fn apply_snapshot_clamps_selection() {
        let mut state = state_with_records(vec![record(1), record(2), record(3)]);
        state.selected = 2;

        state.apply_snapshot(DashboardSnapshot {
            records: vec![record(9)],
            loading: false,
            error: None,
            last_updated: None,
        });

        assert_eq!(state.selected, 0);
        assert_eq!(state.records.len(), 1);
    }

    #[test]
    fn selection_stays_within_bounds() {
        let mut state = state_with_records(vec![record(1), record(2)]);
        state.select_prev();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }
}
