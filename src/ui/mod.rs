//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod screens;

use crate::app::App;
use crate::state::Screen;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match &app.state.screen {
        Screen::Closed => {}
        Screen::Loading(pending) => screens::draw_loading(frame, main_area, pending),
        Screen::LoadFailed(error) => screens::draw_load_failed(frame, main_area, error),
        Screen::Editing(wizard) => forms::draw_wizard(frame, main_area, app, wizard),
        Screen::Saved(receipt) => screens::draw_saved(frame, main_area, receipt),
    }

    layout::draw_status_bar(frame, status_area, app);

    if let Some(pending) = &app.state.pending_leave {
        components::render_leave_dialog(frame, pending);
    }

    // Error dialog overlays everything else
    if let Some(error) = app.state.current_error() {
        let queued = app.state.error_queue.len().saturating_sub(1);
        components::render_error_dialog(frame, error, queued);
    }
}
