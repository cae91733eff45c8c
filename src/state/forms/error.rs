//! Errors raised by the wizard and its loader

use crate::state::OptionKind;
use thiserror::Error;

/// Reasons a submission is refused before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("No signed-in member; sign in again before saving family members")]
    MissingIdentity,
    #[error("Finish step {current} of {last} before saving")]
    NotOnFinalStep { current: usize, last: usize },
    #[error("Fix {count} highlighted field(s) on step {step}")]
    StepInvalid { step: usize, count: usize },
}

/// Failure to gather what the wizard needs before it becomes editable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Could not load {}: {message}", kind.label())]
    Options { kind: OptionKind, message: String },
    #[error("Could not load family member {id}: {message}")]
    Record { id: String, message: String },
    #[error("Family member {0} was not found")]
    RecordNotFound(String),
    #[error("No signed-in member; cannot load family members")]
    MissingIdentity,
}
