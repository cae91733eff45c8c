//! Application logic and event handling

use crate::backend::WizardBackend;
use crate::platform;
use crate::state::{
    AppState, FieldKind, FieldName, LoadError, LoadEvent, LoadProgress, OptionKind, PendingLeave,
    Screen, SubmissionReceipt, SubmissionStatus, UserContext, WizardController, WizardError,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Results of background work, tagged with the screen they were issued for
#[derive(Debug)]
pub enum AppEvent {
    Loaded {
        generation: u64,
        event: LoadEvent,
    },
    Submitted {
        generation: u64,
        result: anyhow::Result<SubmissionReceipt>,
    },
}

/// Main application
pub struct App {
    /// Application state
    pub state: AppState,
    backend: Arc<dyn WizardBackend>,
    context: UserContext,
    record_id: Option<String>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(
        backend: Arc<dyn WizardBackend>,
        context: UserContext,
        record_id: Option<String>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            backend,
            context,
            record_id,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn context(&self) -> &UserContext {
        &self.context
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Mount the wizard screen and start every fetch it needs
    pub fn start(&mut self) {
        let generation = self.state.mount(self.record_id.clone());

        let Some(owner_id) = self.context.member_id.clone() else {
            tracing::warn!("No member id configured; wizard cannot load");
            self.state.screen = Screen::LoadFailed(LoadError::MissingIdentity);
            return;
        };

        tracing::info!(
            "Loading wizard (generation {generation}, record {:?})",
            self.record_id
        );

        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.fetch_options(OptionKind::Villages).await;
            let _ = tx.send(AppEvent::Loaded {
                generation,
                event: LoadEvent::Villages(result),
            });
        });

        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.fetch_dependent_options(&owner_id).await;
            let _ = tx.send(AppEvent::Loaded {
                generation,
                event: LoadEvent::Parents(result),
            });
        });

        if let Some(record_id) = self.record_id.clone() {
            let backend = self.backend.clone();
            let tx = self.events_tx.clone();
            tokio::spawn(async move {
                let result = backend.load_record(&record_id).await;
                let _ = tx.send(AppEvent::Loaded {
                    generation,
                    event: LoadEvent::Record(result),
                });
            });
        }
    }

    /// Tear the screen down and quit
    pub fn leave(&mut self) {
        self.state.unmount();
        self.quit = true;
    }

    /// Handle every background result that has already arrived
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for the next background result
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Apply a background result to the screen it was issued for
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded { generation, event } => {
                if !self.state.is_current(generation) {
                    tracing::debug!("Discarding load result for stale screen {generation}");
                    return;
                }
                let Screen::Loading(pending) = &mut self.state.screen else {
                    tracing::debug!("Discarding load result; screen is no longer loading");
                    return;
                };
                match pending.apply(event) {
                    LoadProgress::Waiting => {}
                    LoadProgress::Ready(loaded) => {
                        tracing::info!("Wizard ready");
                        let wizard = WizardController::new(self.context.clone(), loaded);
                        self.state.screen = Screen::Editing(Box::new(wizard));
                        self.state.active_field = 0;
                    }
                    LoadProgress::Failed(error) => {
                        self.state.screen = Screen::LoadFailed(error);
                    }
                }
            }
            AppEvent::Submitted { generation, result } => {
                if !self.state.is_current(generation) {
                    tracing::debug!("Discarding submission result for stale screen {generation}");
                    return;
                }
                let receipt = result.as_ref().ok().cloned();
                let Some(wizard) = self.state.wizard_mut() else {
                    return;
                };
                wizard.finish_submit(result);
                match (wizard.status().clone(), receipt) {
                    (SubmissionStatus::Succeeded, Some(receipt)) => {
                        self.state.status_message = None;
                        self.state.screen = Screen::Saved(receipt);
                    }
                    (SubmissionStatus::Failed(message), _) => {
                        self.state.status_message = None;
                        self.push_error(format!("Could not save: {message}"));
                    }
                    _ => {}
                }
            }
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Error dialog takes precedence
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        if self.state.pending_leave.is_some() {
            self.handle_leave_dialog_key(key);
            return Ok(());
        }

        match &self.state.screen {
            Screen::Closed => self.quit = true,
            Screen::Loading(_) => {
                if key.code == KeyCode::Esc {
                    self.leave();
                }
            }
            Screen::LoadFailed(_) => match key.code {
                KeyCode::Enter | KeyCode::Char('r') => self.start(),
                KeyCode::Esc | KeyCode::Char('q') => self.leave(),
                _ => {}
            },
            Screen::Saved(_) => self.leave(),
            Screen::Editing(_) => self.handle_wizard_key(key),
        }
        Ok(())
    }

    fn handle_leave_dialog_key(&mut self, key: KeyEvent) {
        let Some(pending) = self.state.pending_leave.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                pending.selected_option = !pending.selected_option;
            }
            KeyCode::Enter => {
                if pending.selected_option {
                    self.leave();
                } else {
                    self.state.pending_leave = None;
                }
            }
            KeyCode::Esc => self.state.pending_leave = None,
            _ => {}
        }
    }

    /// Currently focused field
    pub fn active_field(&self) -> Option<FieldName> {
        let wizard = self.state.wizard()?;
        wizard
            .step_definition()
            .fields
            .get(self.state.active_field)
            .copied()
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        let Some(wizard) = self.state.wizard() else {
            return;
        };
        if *wizard.status() == SubmissionStatus::Submitting {
            return;
        }
        let field_count = wizard.step_definition().fields.len();

        match key.code {
            _ if platform::is_save_key(&key) => self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.state.active_field = (self.state.active_field + 1) % field_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state.active_field = if self.state.active_field == 0 {
                    field_count - 1
                } else {
                    self.state.active_field - 1
                };
            }
            KeyCode::Left => self.cycle_active(-1),
            KeyCode::Right => self.cycle_active(1),
            KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                self.edit_active(|value| value.push(c))
            }
            KeyCode::Backspace => self.edit_active(|value| {
                value.pop();
            }),
            KeyCode::Enter => {
                if wizard.is_last_step() {
                    self.submit();
                } else {
                    self.advance();
                }
            }
            KeyCode::Esc => self.back(),
            _ => {}
        }
    }

    fn cycle_active(&mut self, offset: isize) {
        let Some(name) = self.active_field() else {
            return;
        };
        if let Some(wizard) = self.state.wizard_mut() {
            wizard.cycle_option(name, offset);
        }
    }

    /// Apply a text edit to the focused free-text field
    fn edit_active(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(name) = self.active_field() else {
            return;
        };
        if matches!(name.kind(), FieldKind::Selector(_)) {
            return;
        }
        if let Some(wizard) = self.state.wizard_mut() {
            let mut value = wizard.field(name).value.clone();
            edit(&mut value);
            wizard.update_field(name, value, None);
        }
    }

    fn advance(&mut self) {
        let Some(wizard) = self.state.wizard_mut() else {
            return;
        };
        if wizard.advance() {
            self.state.active_field = 0;
        } else {
            self.focus_first_error();
        }
    }

    fn back(&mut self) {
        let Some(wizard) = self.state.wizard_mut() else {
            return;
        };
        if wizard.retreat() {
            self.state.active_field = 0;
        } else if wizard.is_dirty() {
            self.state.pending_leave = Some(PendingLeave::default());
        } else {
            self.leave();
        }
    }

    fn focus_first_error(&mut self) {
        let Some(wizard) = self.state.wizard() else {
            return;
        };
        let fields = wizard.step_definition().fields;
        if let Some(index) = fields
            .iter()
            .position(|name| wizard.error(*name).is_some())
        {
            self.state.active_field = index;
        }
    }

    /// Start a submission in the background
    fn submit(&mut self) {
        let generation = self.state.generation;
        let Some(wizard) = self.state.wizard_mut() else {
            return;
        };
        match wizard.begin_submit() {
            Ok(Some(payload)) => {
                self.state.status_message = Some("Saving…".to_string());
                let backend = self.backend.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = backend.submit(payload).await;
                    let _ = tx.send(AppEvent::Submitted { generation, result });
                });
            }
            Ok(None) => tracing::debug!("Submission already in flight"),
            Err(error) => {
                if matches!(error, WizardError::StepInvalid { .. }) {
                    self.focus_first_error();
                }
                self.push_error(error.to_string());
            }
        }
    }
}
