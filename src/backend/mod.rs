//! Association backend: collaborator traits and the local JSON implementation

mod local;
mod traits;

pub use local::LocalBackend;
pub use traits::WizardBackend;

#[cfg(test)]
pub use traits::{MockSubmissionSink, OptionProvider, RecordLoader, SubmissionSink};
