//! Family-member wizard rendering

use super::field_renderer::{draw_field, FieldView, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{FieldKind, SubmissionStatus, WizardController};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn form_title(wizard: &WizardController) -> &'static str {
    if wizard.record_id().is_some() {
        " Edit family member "
    } else {
        " Add family member "
    }
}

/// "Step 2 of 4: Contact" followed by one marker per step
fn step_header(wizard: &WizardController) -> Line<'static> {
    let step = wizard.step_definition();
    let mut spans = vec![Span::styled(
        format!("Step {} of {}: {}", step.index, wizard.step_count(), step.title),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("   "));
    for index in 1..=wizard.step_count() {
        let (marker, color) = match index.cmp(&step.index) {
            std::cmp::Ordering::Less => ("● ", Color::Green),
            std::cmp::Ordering::Equal => ("● ", Color::Cyan),
            std::cmp::Ordering::Greater => ("○ ", Color::DarkGray),
        };
        spans.push(Span::styled(marker, Style::default().fg(color)));
    }
    Line::from(spans)
}

fn help_line(wizard: &WizardController) -> Line<'static> {
    if *wizard.status() == SubmissionStatus::Submitting {
        return Line::from(Span::styled(
            "Saving…",
            Style::default().fg(Color::Yellow),
        ));
    }

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
    let enter_action = if wizard.is_last_step() {
        ": save  "
    } else {
        ": next step  "
    };
    let esc_action = if wizard.current_step() > 1 {
        ": back"
    } else {
        ": cancel"
    };

    let mut spans = Vec::new();
    let error_count = wizard.errors().len();
    if error_count > 0 {
        spans.push(Span::styled(
            format!("{error_count} field(s) need attention  "),
            Style::default().fg(Color::Red),
        ));
    }
    spans.extend([
        key("Tab"),
        Span::raw(": next field  "),
        key("←/→"),
        Span::raw(": choose  "),
        key("Enter"),
        Span::raw(enter_action),
        key(crate::platform::SAVE_SHORTCUT),
        Span::raw(": save  "),
        key("Esc"),
        Span::raw(esc_action),
    ]);
    Line::from(spans)
}

/// Draw the wizard for the current step
pub fn draw_wizard(frame: &mut Frame, area: Rect, app: &App, wizard: &WizardController) {
    let fields = wizard.step_definition().fields;

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let block = Block::default()
        .title(form_title(wizard))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    frame.render_widget(Paragraph::new(step_header(wizard)), chunks[0]);

    for (i, name) in fields.iter().enumerate() {
        let options = match name.kind() {
            FieldKind::Selector(kind) => wizard.options(kind),
            _ => None,
        };
        let view = FieldView {
            name: *name,
            state: wizard.field(*name),
            error: wizard.error(*name),
            options: options.as_ref(),
            is_active: app.state.active_field == i,
        };
        draw_field(frame, chunks[i + 1], &view);
    }

    let help = Paragraph::new(help_line(wizard)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[fields.len() + 2]);
}
