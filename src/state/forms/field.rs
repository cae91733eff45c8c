//! Form field value objects

/// A field's raw value paired with its display label
///
/// Selector fields store an id in `value` and the resolved name in `label`;
/// free-text fields keep both equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub label: String,
}

impl FieldState {
    /// Create a field state; the label defaults to the value
    pub fn new(value: impl Into<String>, label: Option<String>) -> Self {
        let value = value.into();
        let label = label.unwrap_or_else(|| value.clone());
        Self { value, label }
    }

    /// Create a text field state whose label mirrors its value
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(value, None)
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Value with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_defaults_to_value() {
        let field = FieldState::new("Ravi", None);
        assert_eq!(field.value, "Ravi");
        assert_eq!(field.label, "Ravi");
    }

    #[test]
    fn test_explicit_label() {
        let field = FieldState::new("v1", Some("Rampur".to_string()));
        assert_eq!(field.value, "v1");
        assert_eq!(field.display_value(), "Rampur");
    }

    #[test]
    fn test_is_blank() {
        assert!(FieldState::default().is_blank());
        assert!(FieldState::text("   ").is_blank());
        assert!(!FieldState::text(" a ").is_blank());
        assert_eq!(FieldState::text(" a ").trimmed(), "a");
    }
}
