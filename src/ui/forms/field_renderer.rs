//! Field rendering utilities for forms

use crate::state::{FieldKind, FieldName, FieldState, OptionList};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of one rendered field, borders included
pub const FIELD_HEIGHT: u16 = 3;

/// Everything needed to draw one field
pub struct FieldView<'a> {
    pub name: FieldName,
    pub state: &'a FieldState,
    pub error: Option<&'a str>,
    /// Options behind a selector field
    pub options: Option<&'a OptionList>,
    pub is_active: bool,
}

fn title(name: FieldName) -> String {
    let required = if name.rule().required { "*" } else { "" };
    match name.hint() {
        Some(hint) => format!(" {}{} ({}) ", name.label(), required, hint),
        None => format!(" {}{} ", name.label(), required),
    }
}

/// Position indicator for selectors, e.g. "2/5"
fn selector_position(view: &FieldView) -> Option<String> {
    let options = view.options?;
    if options.is_empty() {
        return Some("no options".to_string());
    }
    let position = options.position(&view.state.value)?;
    Some(format!("{}/{}", position + 1, options.len()))
}

/// Draw a form field with its error, if any, on the bottom border
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView) {
    let accent = if view.error.is_some() {
        Color::Red
    } else if view.is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let value_style = if view.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display = view.state.display_value();
    let is_selector = matches!(view.name.kind(), FieldKind::Selector(_));

    let mut spans = Vec::new();
    if is_selector && view.is_active {
        spans.push(Span::styled("◂ ", Style::default().fg(Color::Cyan)));
    }
    if display.is_empty() {
        let placeholder = match (is_selector, view.is_active) {
            (true, _) => "(choose)",
            (false, true) => "",
            (false, false) => "(empty)",
        };
        spans.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(display, value_style));
    }
    if is_selector {
        if view.is_active {
            spans.push(Span::styled(" ▸", Style::default().fg(Color::Cyan)));
        }
        if let Some(position) = selector_position(view) {
            spans.push(Span::styled(
                format!("  {position}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
    } else if view.is_active {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let mut block = Block::default()
        .title(title(view.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    if let Some(error) = view.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
