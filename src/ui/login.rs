//! Login screen module

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Renders the login screen: an email prompt with basic editing.
pub fn render_login(f: &mut Frame, input: &str, invalid: bool) {
    let area = centered_box(f.area(), 56, 9);

    let block = Block::default()
        .title(" Sign in ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines = vec![
        Line::from("Email your proxies are registered under:"),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}█", input),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if invalid {
        lines.push(Line::from(Span::styled(
            "That does not look like an email address.",
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Enter to sign in, Esc to exit",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(block);

    f.render_widget(paragraph, area);
}

/// A box of at most `width` x `height` cells, centered in `area`.
fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(area.height.saturating_sub(height) / 2),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(area.height.saturating_sub(height) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(area.width.saturating_sub(width) / 2),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(area.width.saturating_sub(width) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
