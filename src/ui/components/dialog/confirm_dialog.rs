//! Confirmation dialog for leaving a form with unsaved edits

use super::base::{render_dialog, DialogConfig};
use crate::state::PendingLeave;
use ratatui::{
    style::{Color, Style},
    text::Span,
    Frame,
};

const CHOICES: &[&str] = &["Stay", "Discard changes and leave"];

/// Render the leave confirmation; `selected_option` true highlights Leave
pub fn render_leave_dialog(frame: &mut Frame, pending: &PendingLeave) {
    let hint = vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" stay", Style::default().fg(Color::DarkGray)),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Unsaved changes",
            accent: Color::Yellow,
            message: "This family member has edits that were not saved.",
            choices: Some((CHOICES, usize::from(pending.selected_option))),
            hint: Some(hint),
            max_width: 56,
        },
    );
}
