//! Field and step validation
//!
//! Everything here is pure: validators only read the form and the date they
//! are evaluated on.

use super::field::FieldState;
use super::form_state::FormState;
use super::schema::{FieldFormat, FieldName, StepDefinition};
use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Field-scoped error messages; empty means valid
pub type ErrorMap = BTreeMap<FieldName, String>;

/// Oldest accepted date of birth, in years before the evaluation date
pub const MAX_AGE_YEARS: u32 = 100;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email regex"));
static PINCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("pincode regex"));

/// `local@domain.tld`
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Ten digits once separators are stripped, starting with 6, 7, 8 or 9
pub fn is_valid_phone(value: &str) -> bool {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.len() == 10 && matches!(digits[0], '6'..='9')
}

pub fn is_valid_pincode(value: &str) -> bool {
    PINCODE_RE.is_match(value)
}

/// Check a `YYYY-MM-DD` date of birth against `today`
pub fn check_birth_date(value: &str, today: NaiveDate) -> Result<NaiveDate, &'static str> {
    let dob = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "Enter the date as YYYY-MM-DD")?;
    if dob > today {
        return Err("Date of birth cannot be in the future");
    }
    let oldest = today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    if dob < oldest {
        return Err("Date of birth cannot be more than 100 years ago");
    }
    Ok(dob)
}

/// Validate a single field against its declared rule
pub fn check_field(name: FieldName, state: &FieldState, today: NaiveDate) -> Option<String> {
    let rule = name.rule();
    let value = state.trimmed();

    if value.is_empty() {
        return rule
            .required
            .then(|| format!("{} is required", name.label()));
    }

    if let Some(min) = rule.min_len {
        if value.chars().count() < min {
            return Some(format!(
                "{} must be at least {} characters",
                name.label(),
                min
            ));
        }
    }

    let format_error = match rule.format {
        FieldFormat::Free => None,
        FieldFormat::Email => (!is_valid_email(value)).then_some("Enter a valid email address"),
        FieldFormat::Phone => {
            (!is_valid_phone(value)).then_some("Enter a valid 10-digit mobile number")
        }
        FieldFormat::Pincode => (!is_valid_pincode(value)).then_some("Pincode must be 6 digits"),
        FieldFormat::BirthDate => check_birth_date(value, today).err(),
    };
    format_error.map(str::to_string)
}

/// Validate every field of one step
pub fn validate_step(step: &StepDefinition, form: &FormState, today: NaiveDate) -> ErrorMap {
    step.fields
        .iter()
        .filter_map(|&name| check_field(name, form.get(name), today).map(|msg| (name, msg)))
        .collect()
}
