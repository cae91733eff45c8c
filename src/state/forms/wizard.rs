//! Stepped form controller for the family-member wizard
//!
//! Owns the form, the current step and the submission status. Option lists
//! are shared read-only with the loader that fetched them.

use super::error::WizardError;
use super::field::FieldState;
use super::form_state::FormState;
use super::schema::{self, FieldKind, FieldName, StepDefinition, STEPS};
use super::validation::{self, ErrorMap};
#[cfg(test)]
use crate::backend::SubmissionSink;
use crate::state::{
    OptionItem, OptionKind, OptionList, SubmissionPayload, SubmissionReceipt, UserContext,
};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Source of "today" for date validation
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Lifecycle of the final submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Failed with a message for display; the user may retry
    Failed(String),
}

/// Option lists the wizard draws its selectors from
#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    pub villages: Arc<OptionList>,
    pub parents: Arc<OptionList>,
}

impl WizardOptions {
    pub fn new(villages: OptionList, parents: OptionList) -> Self {
        Self {
            villages: Arc::new(villages),
            parents: Arc::new(parents),
        }
    }

    /// Options for a selector kind; static kinds are built on demand
    pub fn list(&self, kind: OptionKind) -> Option<OptionList> {
        match kind {
            OptionKind::Villages => Some(self.villages.as_ref().clone()),
            OptionKind::Parents => Some(self.parents.as_ref().clone()),
            other => other.static_options(),
        }
    }
}

/// A form ready to be edited, produced once every source has loaded
#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub form: FormState,
    /// Id of the record being edited, `None` when creating
    pub record_id: Option<String>,
    pub options: WizardOptions,
}

/// Multi-step form controller
#[derive(Debug, Clone)]
pub struct WizardController {
    context: UserContext,
    record_id: Option<String>,
    options: WizardOptions,
    current_step: usize,
    form: FormState,
    initial: FormState,
    errors: ErrorMap,
    status: SubmissionStatus,
    today: Clock,
}

impl WizardController {
    pub fn new(context: UserContext, loaded: LoadedForm) -> Self {
        Self {
            context,
            record_id: loaded.record_id,
            options: loaded.options,
            current_step: 1,
            initial: loaded.form.clone(),
            form: loaded.form,
            errors: ErrorMap::new(),
            status: SubmissionStatus::Idle,
            today: local_today,
        }
    }

    /// Replace the clock used for date-of-birth checks
    #[cfg(test)]
    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        STEPS.len()
    }

    pub fn step_definition(&self) -> &'static StepDefinition {
        &STEPS[self.current_step - 1]
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.step_count()
    }

    #[cfg(test)]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn field(&self, name: FieldName) -> &FieldState {
        self.form.get(name)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, name: FieldName) -> Option<&str> {
        self.errors.get(&name).map(String::as_str)
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn options(&self, kind: OptionKind) -> Option<OptionList> {
        self.options.list(kind)
    }

    /// Replace a field's value; the label defaults to the value
    ///
    /// Clears the error for this field only. Other fields are not re-checked
    /// until the step is advanced.
    pub fn update_field(
        &mut self,
        name: FieldName,
        value: impl Into<String>,
        label: Option<String>,
    ) {
        self.form.set(name, FieldState::new(value, label));
        self.errors.remove(&name);
    }

    /// Pick an option for a selector and propagate its derived fields
    ///
    /// Derived fields are overwritten unconditionally, even after manual edits.
    pub fn select_option(&mut self, name: FieldName, option: &OptionItem) {
        self.update_field(name, option.value.clone(), Some(option.label.clone()));
        for (attribute, target) in name.derived_fields() {
            if let Some(value) = option.extra(attribute) {
                tracing::debug!("{} selection overwrites {}", name.key(), target.key());
                self.update_field(*target, value, None);
            }
        }
    }

    /// Move a selector to the option `offset` positions away, wrapping around
    ///
    /// Returns false when the field is not a selector or has no options.
    pub fn cycle_option(&mut self, name: FieldName, offset: isize) -> bool {
        let FieldKind::Selector(kind) = name.kind() else {
            return false;
        };
        let Some(list) = self.options.list(kind) else {
            return false;
        };
        if list.is_empty() {
            return false;
        }
        let len = list.len() as isize;
        let next = match list.position(self.form.value(name)) {
            Some(pos) => (pos as isize + offset).rem_euclid(len),
            None if offset < 0 => len - 1,
            None => 0,
        };
        match list.get(next as usize) {
            Some(option) => {
                let option = option.clone();
                self.select_option(name, &option);
                true
            }
            None => false,
        }
    }

    /// Validate one step and replace the error map with the result
    pub fn validate_step(&mut self, index: usize) -> bool {
        let Some(step) = schema::step(index) else {
            return false;
        };
        self.errors = validation::validate_step(step, &self.form, (self.today)());
        self.errors.is_empty()
    }

    /// Move to the next step if the current one is valid
    pub fn advance(&mut self) -> bool {
        if !self.validate_step(self.current_step) || self.is_last_step() {
            return false;
        }
        self.current_step += 1;
        tracing::debug!("Advanced to step {}", self.current_step);
        true
    }

    /// Move back one step without validating
    pub fn retreat(&mut self) -> bool {
        if self.current_step <= 1 {
            return false;
        }
        self.current_step -= 1;
        true
    }

    /// Whether any field differs from the initially loaded form
    pub fn is_dirty(&self) -> bool {
        self.form != self.initial
    }

    /// Check preconditions and mark the submission in flight
    ///
    /// Returns `Ok(None)` without touching any state while a submission is
    /// already in flight or after one succeeded.
    pub fn begin_submit(&mut self) -> Result<Option<SubmissionPayload>, WizardError> {
        if matches!(
            self.status,
            SubmissionStatus::Submitting | SubmissionStatus::Succeeded
        ) {
            return Ok(None);
        }
        let member_id = self
            .context
            .member_id
            .clone()
            .ok_or(WizardError::MissingIdentity)?;
        if !self.is_last_step() {
            return Err(WizardError::NotOnFinalStep {
                current: self.current_step,
                last: self.step_count(),
            });
        }
        if !self.validate_step(self.current_step) {
            return Err(WizardError::StepInvalid {
                step: self.current_step,
                count: self.errors.len(),
            });
        }

        self.status = SubmissionStatus::Submitting;
        Ok(Some(SubmissionPayload {
            member_id,
            record_id: self.record_id.clone(),
            fields: self.form.payload_fields(),
            photo: self.form.photo_path(),
        }))
    }

    /// Record the sink's answer for the in-flight submission
    pub fn finish_submit(&mut self, result: anyhow::Result<SubmissionReceipt>) {
        if self.status != SubmissionStatus::Submitting {
            tracing::warn!("Ignoring submission result with no submission in flight");
            return;
        }
        self.status = match result {
            Ok(receipt) => {
                tracing::info!("Submission {} accepted", receipt.submission_id);
                SubmissionStatus::Succeeded
            }
            Err(e) => {
                tracing::warn!("Submission failed: {e:#}");
                SubmissionStatus::Failed(e.to_string())
            }
        };
    }

    /// Submit through `sink` and wait for the result
    ///
    /// Returns whether a request was sent.
    #[cfg(test)]
    pub async fn submit<S>(&mut self, sink: &S) -> Result<bool, WizardError>
    where
        S: SubmissionSink + ?Sized,
    {
        let Some(payload) = self.begin_submit()? else {
            return Ok(false);
        };
        let result = sink.submit(payload).await;
        self.finish_submit(result);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockSubmissionSink;
    use anyhow::anyhow;
    use chrono::Utc;
    use uuid::Uuid;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn context() -> UserContext {
        UserContext::new(Some("m1".to_string()), "Mohan Patel")
    }

    fn options() -> WizardOptions {
        WizardOptions::new(
            vec![
                OptionItem::new("v1", "Rampur"),
                OptionItem::new("v2", "Sitapur"),
            ]
            .into(),
            vec![
                parent_option(),
                OptionItem::new("p2", "Mohan Patel")
                    .with_extra("firstname", "Mohan")
                    .with_extra("lastname", "Patel"),
            ]
            .into(),
        )
    }

    fn parent_option() -> OptionItem {
        OptionItem::new("p1", "Jane Doe")
            .with_extra("firstname", "Jane")
            .with_extra("lastname", "Doe")
    }

    fn create_wizard() -> WizardController {
        WizardController::new(
            context(),
            LoadedForm {
                form: FormState::new(),
                record_id: None,
                options: options(),
            },
        )
        .with_clock(fixed_today)
    }

    fn receipt() -> SubmissionReceipt {
        SubmissionReceipt {
            submission_id: Uuid::new_v4(),
            accepted_at: Utc::now(),
        }
    }

    fn fill_identity(w: &mut WizardController) {
        w.select_option(FieldName::ParentId, &parent_option());
        w.update_field(FieldName::Firstname, "Anita", None);
        w.cycle_option(FieldName::Gender, 1);
        w.update_field(FieldName::Dob, "2001-01-20", None);
        w.cycle_option(FieldName::Relation, 1);
    }

    fn fill_location(w: &mut WizardController) {
        w.update_field(FieldName::Address, "12 Station Road", None);
        w.cycle_option(FieldName::VillageId, 1);
        w.update_field(FieldName::City, "Pune", None);
        w.update_field(FieldName::Pincode, "400001", None);
    }

    /// Wizard on the last step with every required field filled
    fn ready_wizard() -> WizardController {
        let mut w = create_wizard();
        fill_identity(&mut w);
        assert!(w.advance());
        assert!(w.advance());
        assert!(w.advance());
        fill_location(&mut w);
        w
    }

    mod fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_update_field_is_idempotent() {
            let mut w = create_wizard();
            w.update_field(FieldName::City, "Pune", Some("Pune city".to_string()));
            let once = w.form().clone();
            w.update_field(FieldName::City, "Pune", Some("Pune city".to_string()));
            assert_eq!(w.form(), &once);
        }

        #[test]
        fn test_update_field_label_defaults_to_value() {
            let mut w = create_wizard();
            w.update_field(FieldName::City, "Pune", None);
            assert_eq!(w.field(FieldName::City).label, "Pune");
        }

        #[test]
        fn test_edit_clears_only_that_error() {
            let mut w = create_wizard();
            assert!(!w.validate_step(1));
            assert!(w.error(FieldName::Firstname).is_some());
            let before = w.errors().len();

            w.update_field(FieldName::Firstname, "A", None);

            assert!(w.error(FieldName::Firstname).is_none());
            assert!(w.error(FieldName::Lastname).is_some());
            assert_eq!(w.errors().len(), before - 1);
        }

        #[test]
        fn test_parent_selection_derives_names() {
            let mut w = create_wizard();
            w.update_field(FieldName::Middlename, "Typed", None);
            w.update_field(FieldName::Lastname, "Manually", None);

            w.select_option(FieldName::ParentId, &parent_option());

            assert_eq!(w.field(FieldName::ParentId).value, "p1");
            assert_eq!(w.field(FieldName::ParentId).label, "Jane Doe");
            assert_eq!(w.field(FieldName::Middlename).value, "Jane");
            assert_eq!(w.field(FieldName::Lastname).value, "Doe");
        }

        #[test]
        fn test_reselecting_parent_overwrites_again() {
            let mut w = create_wizard();
            w.select_option(FieldName::ParentId, &parent_option());
            w.update_field(FieldName::Lastname, "Edited", None);
            w.cycle_option(FieldName::ParentId, 1);
            assert_eq!(w.field(FieldName::Middlename).value, "Mohan");
            assert_eq!(w.field(FieldName::Lastname).value, "Patel");
        }

        #[test]
        fn test_option_without_extras_leaves_names() {
            let mut w = create_wizard();
            w.update_field(FieldName::Lastname, "Kept", None);
            w.select_option(FieldName::ParentId, &OptionItem::new("p9", "Unknown"));
            assert_eq!(w.field(FieldName::Lastname).value, "Kept");
        }

        #[test]
        fn test_cycle_option_wraps() {
            let mut w = create_wizard();
            assert!(w.cycle_option(FieldName::VillageId, 1));
            assert_eq!(w.field(FieldName::VillageId).value, "v1");
            assert!(w.cycle_option(FieldName::VillageId, 1));
            assert_eq!(w.field(FieldName::VillageId).label, "Sitapur");
            assert!(w.cycle_option(FieldName::VillageId, 1));
            assert_eq!(w.field(FieldName::VillageId).value, "v1");
            assert!(w.cycle_option(FieldName::VillageId, -1));
            assert_eq!(w.field(FieldName::VillageId).value, "v2");
        }

        #[test]
        fn test_cycle_option_on_text_field() {
            let mut w = create_wizard();
            assert!(!w.cycle_option(FieldName::City, 1));
        }

        #[test]
        fn test_cycle_option_with_empty_list() {
            let mut w = WizardController::new(
                context(),
                LoadedForm {
                    form: FormState::new(),
                    record_id: None,
                    options: WizardOptions::default(),
                },
            );
            assert!(!w.cycle_option(FieldName::VillageId, 1));
            assert_eq!(w.field(FieldName::VillageId).value, "");
        }
    }

    mod steps {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_on_first_step_idle() {
            let w = create_wizard();
            assert_eq!(w.current_step(), 1);
            assert_eq!(w.step_count(), 4);
            assert_eq!(w.status(), &SubmissionStatus::Idle);
            assert_eq!(w.step_definition().title, "Identity");
        }

        #[test]
        fn test_advance_blocked_by_unmet_field() {
            let mut w = create_wizard();
            fill_identity(&mut w);
            w.update_field(FieldName::Firstname, "", None);

            assert!(!w.advance());

            assert_eq!(w.current_step(), 1);
            let keys: Vec<_> = w.errors().keys().copied().collect();
            assert_eq!(keys, vec![FieldName::Firstname]);
        }

        #[test]
        fn test_advance_moves_forward_when_valid() {
            let mut w = create_wizard();
            fill_identity(&mut w);
            assert!(w.advance());
            assert_eq!(w.current_step(), 2);
            assert!(w.errors().is_empty());
        }

        #[test]
        fn test_advance_stops_at_last_step() {
            let mut w = ready_wizard();
            assert_eq!(w.current_step(), 4);
            assert!(!w.advance());
            assert_eq!(w.current_step(), 4);
        }

        #[test]
        fn test_invalid_contact_blocks_advance() {
            let mut w = create_wizard();
            fill_identity(&mut w);
            w.advance();
            w.update_field(FieldName::Phone, "5876543210", None);
            assert!(!w.advance());
            assert_eq!(w.current_step(), 2);
            assert!(w.error(FieldName::Phone).is_some());
        }

        #[test]
        fn test_retreat_never_validates() {
            let mut w = create_wizard();
            fill_identity(&mut w);
            w.advance();
            w.update_field(FieldName::Email, "broken", None);
            assert!(w.retreat());
            assert_eq!(w.current_step(), 1);
            assert!(w.errors().is_empty());
        }

        #[test]
        fn test_retreat_on_first_step_is_noop() {
            let mut w = create_wizard();
            assert!(!w.retreat());
            assert_eq!(w.current_step(), 1);
        }

        #[test]
        fn test_validate_unknown_step() {
            let mut w = create_wizard();
            assert!(!w.validate_step(0));
            assert!(!w.validate_step(9));
        }

        #[test]
        fn test_dirty_tracking() {
            let mut w = create_wizard();
            assert!(!w.is_dirty());
            w.update_field(FieldName::City, "Pune", None);
            assert!(w.is_dirty());
            w.update_field(FieldName::City, "", None);
            assert!(!w.is_dirty());
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_submit_success() {
            let mut w = ready_wizard();
            let mut sink = MockSubmissionSink::new();
            sink.expect_submit()
                .times(1)
                .withf(|p| {
                    p.member_id == "m1"
                        && p.record_id.is_none()
                        && p.fields["middlename"] == "Jane"
                        && p.fields["village_id"] == "v1"
                        && p.fields["email"].is_empty()
                        && p.photo.is_none()
                })
                .returning(|_| Ok(receipt()));

            assert_eq!(w.submit(&sink).await, Ok(true));
            assert_eq!(w.status(), &SubmissionStatus::Succeeded);
        }

        #[tokio::test]
        async fn test_submit_failure_keeps_form_and_allows_retry() {
            let mut w = ready_wizard();
            let form_before = w.form().clone();
            let mut sink = MockSubmissionSink::new();
            let mut seq = mockall::Sequence::new();
            sink.expect_submit()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(anyhow!("Server rejected the record")));
            sink.expect_submit()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(receipt()));

            assert_eq!(w.submit(&sink).await, Ok(true));
            assert_eq!(
                w.status(),
                &SubmissionStatus::Failed("Server rejected the record".to_string())
            );
            assert_eq!(w.form(), &form_before);

            assert_eq!(w.submit(&sink).await, Ok(true));
            assert_eq!(w.status(), &SubmissionStatus::Succeeded);
        }

        #[tokio::test]
        async fn test_submit_while_submitting_is_noop() {
            let mut w = ready_wizard();
            let payload = w.begin_submit().unwrap();
            assert!(payload.is_some());
            assert_eq!(w.status(), &SubmissionStatus::Submitting);

            let mut sink = MockSubmissionSink::new();
            sink.expect_submit().times(0);

            let form_before = w.form().clone();
            assert_eq!(w.submit(&sink).await, Ok(false));
            assert_eq!(w.status(), &SubmissionStatus::Submitting);
            assert_eq!(w.form(), &form_before);
        }

        #[test]
        fn test_begin_submit_twice_yields_one_payload() {
            let mut w = ready_wizard();
            assert!(w.begin_submit().unwrap().is_some());
            assert_eq!(w.begin_submit(), Ok(None));
        }

        #[test]
        fn test_submit_after_success_is_noop() {
            let mut w = ready_wizard();
            w.begin_submit().unwrap();
            w.finish_submit(Ok(receipt()));
            assert_eq!(w.begin_submit(), Ok(None));
            assert_eq!(w.status(), &SubmissionStatus::Succeeded);
        }

        #[test]
        fn test_submit_requires_final_step() {
            let mut w = create_wizard();
            fill_identity(&mut w);
            assert_eq!(
                w.begin_submit(),
                Err(WizardError::NotOnFinalStep { current: 1, last: 4 })
            );
            assert_eq!(w.status(), &SubmissionStatus::Idle);
        }

        #[test]
        fn test_submit_requires_valid_final_step() {
            let mut w = ready_wizard();
            w.update_field(FieldName::Pincode, "40001", None);
            assert_eq!(
                w.begin_submit(),
                Err(WizardError::StepInvalid { step: 4, count: 1 })
            );
            assert!(w.error(FieldName::Pincode).is_some());
            assert_eq!(w.status(), &SubmissionStatus::Idle);
        }

        #[test]
        fn test_submit_requires_identity() {
            let mut w = ready_wizard();
            w.context = UserContext::new(None, "Guest");
            assert_eq!(w.begin_submit(), Err(WizardError::MissingIdentity));
            assert_eq!(w.status(), &SubmissionStatus::Idle);
        }

        #[test]
        fn test_payload_carries_record_id_and_photo() {
            let mut w = ready_wizard();
            w.record_id = Some("f7".to_string());
            w.update_field(FieldName::Photo, "/tmp/anita.jpg", None);
            let payload = w.begin_submit().unwrap().unwrap();
            assert_eq!(payload.record_id.as_deref(), Some("f7"));
            assert_eq!(payload.photo, Some(std::path::PathBuf::from("/tmp/anita.jpg")));
            assert!(!payload.fields.contains_key("photo"));
        }

        #[test]
        fn test_finish_without_submission_is_ignored() {
            let mut w = ready_wizard();
            w.finish_submit(Ok(receipt()));
            assert_eq!(w.status(), &SubmissionStatus::Idle);
        }
    }
}
