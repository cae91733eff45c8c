//! Loading, load-failure and saved screens

use crate::state::{LoadError, PendingForm, SubmissionReceipt};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn centered_panel<'a>(title: &'a str, color: Color, lines: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
}

pub fn draw_loading(frame: &mut Frame, area: Rect, pending: &PendingForm) {
    let waiting = pending.waiting_on().join(", ");
    let heading = match pending.record_id() {
        Some(id) => format!("Loading family member {id}…"),
        None => "Loading…".to_string(),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Waiting for {waiting}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(centered_panel("Family member", Color::Cyan, lines), area);
}

pub fn draw_load_failed(frame: &mut Frame, area: Rect, error: &LoadError) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" to retry, "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" to quit"),
        ]),
    ];
    frame.render_widget(centered_panel("Cannot open form", Color::Red, lines), area);
}

pub fn draw_saved(frame: &mut Frame, area: Rect, receipt: &SubmissionReceipt) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Family member saved",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Submission {} at {}",
                receipt.submission_id,
                receipt.accepted_at.format("%Y-%m-%d %H:%M UTC")
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from("Press any key to close"),
    ];
    frame.render_widget(centered_panel("Saved", Color::Green, lines), area);
}
