//! Static schema of the family-member form
//!
//! Every field is a [`FieldName`] variant, so lookups are checked at compile
//! time instead of going through string keys.

use crate::state::OptionKind;

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Value chosen from an option list
    Selector(OptionKind),
    /// ISO `YYYY-MM-DD` date
    Date,
    /// Path to a file passed alongside the payload
    Attachment,
}

/// Format check applied to a non-empty value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Free,
    Email,
    Phone,
    Pincode,
    BirthDate,
}

/// Validation rule declared for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub required: bool,
    /// Minimum length in characters, checked only when a value is present
    pub min_len: Option<usize>,
    pub format: FieldFormat,
}

impl FieldRule {
    const fn optional() -> Self {
        Self {
            required: false,
            min_len: None,
            format: FieldFormat::Free,
        }
    }

    const fn required() -> Self {
        Self {
            required: true,
            min_len: None,
            format: FieldFormat::Free,
        }
    }

    const fn min_len(self, len: usize) -> Self {
        Self {
            min_len: Some(len),
            ..self
        }
    }

    const fn format(self, format: FieldFormat) -> Self {
        Self { format, ..self }
    }
}

/// Every field of the family-member form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    ParentId,
    Firstname,
    Middlename,
    Lastname,
    Gender,
    Dob,
    Relation,
    Email,
    Phone,
    AlternatePhone,
    Education,
    Occupation,
    Company,
    Address,
    VillageId,
    City,
    Pincode,
    Photo,
}

impl FieldName {
    pub const COUNT: usize = 18;

    pub const ALL: [FieldName; Self::COUNT] = [
        Self::ParentId,
        Self::Firstname,
        Self::Middlename,
        Self::Lastname,
        Self::Gender,
        Self::Dob,
        Self::Relation,
        Self::Email,
        Self::Phone,
        Self::AlternatePhone,
        Self::Education,
        Self::Occupation,
        Self::Company,
        Self::Address,
        Self::VillageId,
        Self::City,
        Self::Pincode,
        Self::Photo,
    ];

    /// Position within [`FieldName::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used in the submission payload
    pub fn key(self) -> &'static str {
        match self {
            Self::ParentId => "parent_id",
            Self::Firstname => "firstname",
            Self::Middlename => "middlename",
            Self::Lastname => "lastname",
            Self::Gender => "gender",
            Self::Dob => "dob",
            Self::Relation => "relation",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::AlternatePhone => "alternate_phone",
            Self::Education => "education",
            Self::Occupation => "occupation",
            Self::Company => "company",
            Self::Address => "address",
            Self::VillageId => "village_id",
            Self::City => "city",
            Self::Pincode => "pincode",
            Self::Photo => "photo",
        }
    }

    /// Label shown next to the input
    pub fn label(self) -> &'static str {
        match self {
            Self::ParentId => "Parent",
            Self::Firstname => "First name",
            Self::Middlename => "Middle name",
            Self::Lastname => "Last name",
            Self::Gender => "Gender",
            Self::Dob => "Date of birth",
            Self::Relation => "Relation",
            Self::Email => "Email",
            Self::Phone => "Mobile number",
            Self::AlternatePhone => "Alternate mobile",
            Self::Education => "Education",
            Self::Occupation => "Occupation",
            Self::Company => "Company / business",
            Self::Address => "Address",
            Self::VillageId => "Village",
            Self::City => "City",
            Self::Pincode => "Pincode",
            Self::Photo => "Photo",
        }
    }

    /// Input hint rendered after the label
    pub fn hint(self) -> Option<&'static str> {
        match self.kind() {
            FieldKind::Selector(_) => Some("←/→ to choose"),
            FieldKind::Date => Some("YYYY-MM-DD"),
            FieldKind::Attachment => Some("path to an image file"),
            FieldKind::Text => None,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::ParentId => FieldKind::Selector(OptionKind::Parents),
            Self::Gender => FieldKind::Selector(OptionKind::Gender),
            Self::Relation => FieldKind::Selector(OptionKind::Relation),
            Self::VillageId => FieldKind::Selector(OptionKind::Villages),
            Self::Dob => FieldKind::Date,
            Self::Photo => FieldKind::Attachment,
            _ => FieldKind::Text,
        }
    }

    pub fn rule(self) -> FieldRule {
        match self {
            Self::ParentId | Self::Gender | Self::Relation | Self::VillageId => {
                FieldRule::required()
            }
            Self::Firstname | Self::Middlename | Self::Lastname | Self::City => {
                FieldRule::required().min_len(2)
            }
            Self::Address => FieldRule::required().min_len(5),
            Self::Dob => FieldRule::required().format(FieldFormat::BirthDate),
            Self::Pincode => FieldRule::required().format(FieldFormat::Pincode),
            Self::Email => FieldRule::optional().format(FieldFormat::Email),
            Self::Phone | Self::AlternatePhone => FieldRule::optional().format(FieldFormat::Phone),
            Self::Education | Self::Occupation => FieldRule::optional().min_len(2),
            Self::Company | Self::Photo => FieldRule::optional(),
        }
    }

    /// Fields overwritten when this selector picks an option, paired with the
    /// option attribute they are copied from
    pub fn derived_fields(self) -> &'static [(&'static str, FieldName)] {
        match self {
            Self::ParentId => &[
                ("firstname", FieldName::Middlename),
                ("lastname", FieldName::Lastname),
            ],
            _ => &[],
        }
    }
}

/// One page of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    /// 1-based position
    pub index: usize,
    pub title: &'static str,
    pub fields: &'static [FieldName],
}

pub const STEPS: [StepDefinition; 4] = [
    StepDefinition {
        index: 1,
        title: "Identity",
        fields: &[
            FieldName::ParentId,
            FieldName::Firstname,
            FieldName::Middlename,
            FieldName::Lastname,
            FieldName::Gender,
            FieldName::Dob,
            FieldName::Relation,
        ],
    },
    StepDefinition {
        index: 2,
        title: "Contact",
        fields: &[FieldName::Email, FieldName::Phone, FieldName::AlternatePhone],
    },
    StepDefinition {
        index: 3,
        title: "Professional",
        fields: &[
            FieldName::Education,
            FieldName::Occupation,
            FieldName::Company,
        ],
    },
    StepDefinition {
        index: 4,
        title: "Location",
        fields: &[
            FieldName::Address,
            FieldName::VillageId,
            FieldName::City,
            FieldName::Pincode,
            FieldName::Photo,
        ],
    },
];

/// Look up a step by its 1-based index
pub fn step(index: usize) -> Option<&'static StepDefinition> {
    index.checked_sub(1).and_then(|i| STEPS.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_is_in_declaration_order() {
        for (i, name) in FieldName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_every_field_belongs_to_exactly_one_step() {
        let mut seen = HashSet::new();
        for step in STEPS.iter() {
            for field in step.fields {
                assert!(seen.insert(*field), "{field:?} listed twice");
            }
        }
        assert_eq!(seen.len(), FieldName::COUNT);
    }

    #[test]
    fn test_step_indices_are_one_based() {
        for (i, step) in STEPS.iter().enumerate() {
            assert_eq!(step.index, i + 1);
        }
        assert!(step(0).is_none());
        assert_eq!(step(1).unwrap().title, "Identity");
        assert_eq!(step(4).unwrap().title, "Location");
        assert!(step(5).is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = FieldName::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(keys.len(), FieldName::COUNT);
    }

    #[test]
    fn test_parent_derives_names() {
        let derived = FieldName::ParentId.derived_fields();
        assert!(derived.contains(&("firstname", FieldName::Middlename)));
        assert!(derived.contains(&("lastname", FieldName::Lastname)));
        assert!(FieldName::VillageId.derived_fields().is_empty());
    }

    #[test]
    fn test_selector_kinds() {
        assert_eq!(
            FieldName::VillageId.kind(),
            FieldKind::Selector(OptionKind::Villages)
        );
        assert_eq!(FieldName::Dob.kind(), FieldKind::Date);
        assert_eq!(FieldName::Photo.kind(), FieldKind::Attachment);
        assert_eq!(FieldName::City.kind(), FieldKind::Text);
    }
}
