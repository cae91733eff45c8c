//! Barrier that assembles the initial form from independently loaded sources
//!
//! Villages, parents and (when editing) the record arrive in any order. The
//! form only becomes editable once all of them are present, because selector
//! labels are resolved through the option lists.

use super::error::LoadError;
use super::form_state::FormState;
use super::wizard::{LoadedForm, WizardOptions};
use crate::state::{MemberRecord, OptionKind, OptionList};

/// One source finishing its fetch
#[derive(Debug)]
pub enum LoadEvent {
    Villages(anyhow::Result<OptionList>),
    Parents(anyhow::Result<OptionList>),
    Record(anyhow::Result<Option<MemberRecord>>),
}

/// Outcome of feeding the barrier
#[derive(Debug)]
pub enum LoadProgress {
    /// Still waiting on at least one source
    Waiting,
    Ready(LoadedForm),
    Failed(LoadError),
}

/// Collects load results until the form can be built
#[derive(Debug, Clone, Default)]
pub struct PendingForm {
    record_id: Option<String>,
    villages: Option<OptionList>,
    parents: Option<OptionList>,
    record: Option<MemberRecord>,
    failure: Option<LoadError>,
    done: bool,
}

impl PendingForm {
    /// `record_id` is `Some` when editing an existing family member
    pub fn new(record_id: Option<String>) -> Self {
        Self {
            record_id,
            ..Default::default()
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// Labels of the sources still outstanding, for the loading screen
    pub fn waiting_on(&self) -> Vec<&'static str> {
        let mut waiting = Vec::new();
        if self.villages.is_none() {
            waiting.push(OptionKind::Villages.label());
        }
        if self.parents.is_none() {
            waiting.push(OptionKind::Parents.label());
        }
        if self.record_id.is_some() && self.record.is_none() {
            waiting.push("record");
        }
        waiting
    }

    /// Feed one result into the barrier
    pub fn apply(&mut self, event: LoadEvent) -> LoadProgress {
        if self.done {
            tracing::debug!("Ignoring load event after the form was built");
            return LoadProgress::Waiting;
        }
        if self.failure.is_none() {
            if let Err(error) = self.store(event) {
                tracing::warn!("Load failed: {error}");
                self.failure = Some(error);
            }
        }
        self.progress()
    }

    fn store(&mut self, event: LoadEvent) -> Result<(), LoadError> {
        match event {
            LoadEvent::Villages(result) => {
                let list = result.map_err(|e| LoadError::Options {
                    kind: OptionKind::Villages,
                    message: e.to_string(),
                })?;
                tracing::debug!("Loaded {} villages", list.len());
                self.villages = Some(list);
            }
            LoadEvent::Parents(result) => {
                let list = result.map_err(|e| LoadError::Options {
                    kind: OptionKind::Parents,
                    message: e.to_string(),
                })?;
                tracing::debug!("Loaded {} eligible parents", list.len());
                self.parents = Some(list);
            }
            LoadEvent::Record(result) => {
                let id = self.record_id.clone().unwrap_or_default();
                let record = result
                    .map_err(|e| LoadError::Record {
                        id: id.clone(),
                        message: e.to_string(),
                    })?
                    .ok_or(LoadError::RecordNotFound(id))?;
                self.record = Some(record);
            }
        }
        Ok(())
    }

    fn progress(&mut self) -> LoadProgress {
        if let Some(error) = &self.failure {
            return LoadProgress::Failed(error.clone());
        }
        if !self.waiting_on().is_empty() {
            return LoadProgress::Waiting;
        }

        let options = WizardOptions::new(
            self.villages.take().unwrap_or_default(),
            self.parents.take().unwrap_or_default(),
        );
        let form = match self.record.take() {
            Some(record) => FormState::from_record(&record, |kind| options.list(kind)),
            None => FormState::new(),
        };
        self.done = true;
        LoadProgress::Ready(LoadedForm {
            form,
            record_id: self.record_id.clone(),
            options,
        })
    }
}
