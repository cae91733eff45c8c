//! Layout components (header, status bar)

use crate::app::App;
use crate::state::{Screen, SubmissionStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with the signed-in member
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let context = app.context();
    let member = match &context.member_id {
        Some(id) => Span::styled(
            format!("{} ({id})", context.display_name),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("not signed in", Style::default().fg(Color::Red)),
    };
    let header = Line::from(vec![
        Span::styled(
            " Family members ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        member,
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {}", get_screen_hints(app)),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current screen
fn get_screen_hints(app: &App) -> String {
    match &app.state.screen {
        Screen::Closed => String::new(),
        Screen::Loading(_) => "Esc:cancel".to_string(),
        Screen::LoadFailed(_) => "Enter/r:retry  Esc:quit".to_string(),
        Screen::Saved(_) => "Press any key to close".to_string(),
        Screen::Editing(wizard) => {
            if *wizard.status() == SubmissionStatus::Submitting {
                "Saving…".to_string()
            } else {
                format!(
                    "Tab/↑↓:field  ←/→:choose  Enter:next  {}:save  Esc:back",
                    crate::platform::SAVE_SHORTCUT
                )
            }
        }
    }
}
