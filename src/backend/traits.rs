//! Collaborator traits the wizard talks to, mockable in tests

use crate::state::{MemberRecord, OptionKind, OptionList, SubmissionPayload, SubmissionReceipt};
use anyhow::Result;
use async_trait::async_trait;

/// Supplies the choice lists for selector fields
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionProvider: Send + Sync {
    /// Fetch an independent option list such as villages
    async fn fetch_options(&self, kind: OptionKind) -> Result<OptionList>;

    /// Fetch options that depend on the owning member, such as eligible parents
    async fn fetch_dependent_options(&self, owner_id: &str) -> Result<OptionList>;
}

/// Loads an existing family member for editing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordLoader: Send + Sync {
    /// Returns `Ok(None)` when no record has this id
    async fn load_record(&self, id: &str) -> Result<Option<MemberRecord>>;
}

/// Accepts assembled submissions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt>;
}

/// Everything the wizard screen needs from the association backend
pub trait WizardBackend: OptionProvider + RecordLoader + SubmissionSink {}

impl<T> WizardBackend for T where T: OptionProvider + RecordLoader + SubmissionSink {}
