//! Form field value objects

use super::schema::{FieldKind, FieldName, FieldSpec};

/// Represents a single form field with its schema entry and current value
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    value: String,
}

impl FormField {
    /// Create an empty field for a schema entry
    pub fn new(name: FieldName) -> Self {
        Self {
            spec: name.spec(),
            value: String::new(),
        }
    }

    pub fn name(&self) -> FieldName {
        self.spec.name
    }

    pub fn label(&self) -> &'static str {
        self.spec.label
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.spec.kind, FieldKind::LongText)
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.spec.kind, FieldKind::Choice(_))
    }

    /// Get the raw value
    pub fn as_text(&self) -> &str {
        &self.value
    }

    /// Set the raw value
    pub fn set_text(&mut self, value: String) {
        self.value = value;
    }

    /// Value after appending a typed character. Choice fields are not typed into.
    pub fn with_char(&self, c: char) -> Option<String> {
        match self.spec.kind {
            FieldKind::Choice(_) => None,
            FieldKind::Number if !(c.is_ascii_digit() || c == '.' || c == '-') => None,
            FieldKind::Text | FieldKind::Number if c == '\n' => None,
            _ => {
                let mut next = self.value.clone();
                next.push(c);
                Some(next)
            }
        }
    }

    /// Value after removing the last character
    pub fn without_last_char(&self) -> Option<String> {
        if self.value.is_empty() {
            return None;
        }
        if self.is_choice() {
            return Some(String::new());
        }
        let mut next = self.value.clone();
        next.pop();
        Some(next)
    }

    /// Value after stepping through the choice list. An empty value steps
    /// onto the first (or last) choice; stepping past either end wraps to
    /// the empty "Select" state.
    pub fn cycle_choice(&self, forward: bool) -> Option<String> {
        let FieldKind::Choice(choices) = self.spec.kind else {
            return None;
        };
        let current = choices.iter().position(|c| *c == self.value);
        let next = match (current, forward) {
            (None, true) => choices.first().copied(),
            (None, false) => choices.last().copied(),
            (Some(i), true) => choices.get(i + 1).copied(),
            (Some(0), false) => None,
            (Some(i), false) => choices.get(i - 1).copied(),
        };
        Some(next.unwrap_or_default().to_string())
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        if self.is_choice() && self.value.is_empty() {
            "Select".to_string()
        } else {
            self.value.clone()
        }
    }
}
