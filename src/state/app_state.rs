//! Application state definitions

use super::forms::{LoadError, PendingForm, WizardController};
use super::SubmissionReceipt;
use std::collections::VecDeque;

/// What the wizard screen is currently showing
#[derive(Debug, Clone, Default)]
pub enum Screen {
    /// No wizard mounted
    #[default]
    Closed,
    /// Waiting for option lists and, when editing, the record
    Loading(PendingForm),
    /// Blocking load failure; retried manually
    LoadFailed(LoadError),
    Editing(Box<WizardController>),
    /// Submission accepted; any key leaves
    Saved(SubmissionReceipt),
}

/// Confirmation shown before leaving a form with unsaved edits
#[derive(Debug, Clone, Default)]
pub struct PendingLeave {
    /// true = Leave selected, false = Stay selected
    pub selected_option: bool,
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub screen: Screen,
    /// Identifies the mounted screen; bumped on every mount and teardown
    pub generation: u64,
    /// Index of the focused field within the current step
    pub active_field: usize,
    /// Error messages waiting to be shown, oldest first
    pub error_queue: VecDeque<String>,
    pub pending_leave: Option<PendingLeave>,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    pub fn wizard(&self) -> Option<&WizardController> {
        match &self.screen {
            Screen::Editing(w) => Some(w.as_ref()),
            _ => None,
        }
    }

    pub fn wizard_mut(&mut self) -> Option<&mut WizardController> {
        match &mut self.screen {
            Screen::Editing(w) => Some(w.as_mut()),
            _ => None,
        }
    }

    /// Start a new screen instance and return its generation
    pub fn mount(&mut self, record_id: Option<String>) -> u64 {
        self.generation += 1;
        self.screen = Screen::Loading(PendingForm::new(record_id));
        self.active_field = 0;
        self.pending_leave = None;
        self.generation
    }

    /// Tear the screen down; results still in flight become stale
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.screen = Screen::Closed;
        self.pending_leave = None;
    }

    /// Whether a result issued for `generation` still belongs to the screen
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && !matches!(self.screen, Screen::Closed)
    }
}
