//! Form state for the family-member wizard

use super::field::FieldState;
use super::schema::{FieldKind, FieldName};
use crate::state::{MemberRecord, OptionKind, OptionList};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Every schema field with its current value
///
/// Backed by one slot per [`FieldName`], so a field can be empty but never
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: [FieldState; FieldName::COUNT],
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: FieldName) -> &FieldState {
        &self.fields[name.index()]
    }

    pub fn set(&mut self, name: FieldName, state: FieldState) {
        self.fields[name.index()] = state;
    }

    /// Raw value of a field
    pub fn value(&self, name: FieldName) -> &str {
        &self.get(name).value
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldState)> {
        FieldName::ALL.iter().copied().zip(self.fields.iter())
    }

    /// Build the initial state for an existing record
    ///
    /// Selector ids resolve their labels through `lookup`; ids that are not in
    /// the list keep the id as their label.
    pub fn from_record<F>(record: &MemberRecord, lookup: F) -> Self
    where
        F: Fn(OptionKind) -> Option<OptionList>,
    {
        let mut form = Self::new();
        for name in FieldName::ALL {
            let value = record_value(record, name);
            let state = match name.kind() {
                FieldKind::Selector(kind) if !value.is_empty() => {
                    let label = lookup(kind)
                        .map(|list| list.label_for(&value))
                        .unwrap_or_else(|| value.clone());
                    FieldState::new(value, Some(label))
                }
                _ => FieldState::text(value),
            };
            form.set(name, state);
        }
        form
    }

    /// Flatten every non-attachment field into payload entries
    ///
    /// Optional fields that were never filled are sent as empty strings.
    pub fn payload_fields(&self) -> BTreeMap<String, String> {
        self.iter()
            .filter(|(name, _)| name.kind() != FieldKind::Attachment)
            .map(|(name, state)| (name.key().to_string(), state.trimmed().to_string()))
            .collect()
    }

    /// Attachment reference, if one was provided
    pub fn photo_path(&self) -> Option<PathBuf> {
        let photo = self.get(FieldName::Photo);
        (!photo.is_blank()).then(|| PathBuf::from(photo.trimmed()))
    }
}

fn record_value(record: &MemberRecord, name: FieldName) -> String {
    let value = match name {
        FieldName::ParentId => &record.parent_id,
        FieldName::Firstname => &record.firstname,
        FieldName::Middlename => &record.middlename,
        FieldName::Lastname => &record.lastname,
        FieldName::Gender => &record.gender,
        FieldName::Dob => &record.dob,
        FieldName::Relation => &record.relation,
        FieldName::Email => &record.email,
        FieldName::Phone => &record.phone,
        FieldName::AlternatePhone => &record.alternate_phone,
        FieldName::Education => &record.education,
        FieldName::Occupation => &record.occupation,
        FieldName::Company => &record.company,
        FieldName::Address => &record.address,
        FieldName::VillageId => &record.village_id,
        FieldName::City => &record.city,
        FieldName::Pincode => &record.pincode,
        FieldName::Photo => return record.photo.clone().unwrap_or_default(),
    };
    value.clone()
}
