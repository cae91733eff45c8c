//! Form domain layer
//!
//! Type-safe schema, validation and the stepped controller behind the
//! family-member wizard.

mod error;
mod field;
mod form_state;
mod loader;
mod schema;
mod validation;
mod wizard;

pub use error::{LoadError, WizardError};
pub use field::FieldState;
pub use loader::{LoadEvent, LoadProgress, PendingForm};
pub use schema::{FieldKind, FieldName};
pub use wizard::{SubmissionStatus, WizardController};
