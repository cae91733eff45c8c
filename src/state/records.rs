//! Records exchanged with the association backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// A single choice offered by a selector field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Identifier stored in the form
    pub value: String,
    /// Human-readable name shown in the selector
    pub label: String,
    /// Auxiliary attributes, e.g. a parent's first and last name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// Ordered list of options for one selector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionList(Vec<OptionItem>);

impl OptionList {
    /// Find the option carrying `value`
    pub fn find(&self, value: &str) -> Option<&OptionItem> {
        self.iter().find(|o| o.value == value)
    }

    /// Position of the option carrying `value`
    pub fn position(&self, value: &str) -> Option<usize> {
        self.iter().position(|o| o.value == value)
    }

    pub fn get(&self, index: usize) -> Option<&OptionItem> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionItem> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve an id to its display label, falling back to the id itself
    pub fn label_for(&self, value: &str) -> String {
        self.find(value)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| value.to_string())
    }
}

impl From<Vec<OptionItem>> for OptionList {
    fn from(items: Vec<OptionItem>) -> Self {
        Self(items)
    }
}

/// Source of a selector's option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Villages served by the association (remote)
    Villages,
    /// Eligible parents within the owning member's family (remote)
    Parents,
    Gender,
    Relation,
}

impl OptionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Villages => "villages",
            Self::Parents => "family members",
            Self::Gender => "genders",
            Self::Relation => "relations",
        }
    }

    /// Built-in lists that never hit the backend
    pub fn static_options(&self) -> Option<OptionList> {
        let pairs: &[(&str, &str)] = match self {
            Self::Villages | Self::Parents => return None,
            Self::Gender => &[("male", "Male"), ("female", "Female"), ("other", "Other")],
            Self::Relation => &[
                ("son", "Son"),
                ("daughter", "Daughter"),
                ("wife", "Wife"),
                ("husband", "Husband"),
                ("daughter_in_law", "Daughter-in-law"),
                ("grandson", "Grandson"),
                ("granddaughter", "Granddaughter"),
                ("other", "Other"),
            ],
        };
        Some(
            pairs
                .iter()
                .map(|(value, label)| OptionItem::new(*value, *label))
                .collect::<Vec<_>>()
                .into(),
        )
    }
}

/// The signed-in member the wizard acts on behalf of
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    /// Member id; submissions are blocked without it
    pub member_id: Option<String>,
    pub display_name: String,
}

impl UserContext {
    pub fn new(member_id: Option<String>, display_name: impl Into<String>) -> Self {
        Self {
            member_id: member_id.filter(|id| !id.trim().is_empty()),
            display_name: display_name.into(),
        }
    }
}

/// A saved family member as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberRecord {
    pub id: String,
    /// Member who owns this family entry
    pub owner_id: String,
    pub parent_id: String,
    pub firstname: String,
    pub middlename: String,
    pub lastname: String,
    pub gender: String,
    pub dob: String,
    pub relation: String,
    pub email: String,
    pub phone: String,
    pub alternate_phone: String,
    pub education: String,
    pub occupation: String,
    pub company: String,
    pub address: String,
    pub village_id: String,
    pub city: String,
    pub pincode: String,
    pub photo: Option<String>,
}

impl MemberRecord {
    pub fn full_name(&self) -> String {
        [&self.firstname, &self.middlename, &self.lastname]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Flat payload handed to the submission sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub member_id: String,
    /// Present when editing an existing record
    pub record_id: Option<String>,
    pub fields: BTreeMap<String, String>,
    /// Attachment passed by reference, never inlined
    pub photo: Option<PathBuf>,
}

/// Acknowledgment of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub accepted_at: DateTime<Utc>,
}
