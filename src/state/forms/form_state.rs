//! Form state management
//!
//! `FormStateStore` is the single owner of field values, the last computed
//! errors and the submission phase. Values of fields that drop out of the
//! active set are kept, so switching back to a topic shows them again.

use super::field::FormField;
use super::schema::{active_fields, FieldName, FormError, Topic};
use super::validation::{validate, ErrorMap};
use crate::state::SubmissionPhase;
use std::collections::BTreeMap;

/// Trait for focus movement over a form's visible fields
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Raw values for every schema field, active or not
#[derive(Debug, Clone)]
pub struct FormValues {
    fields: Vec<FormField>,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            fields: FieldName::ALL.iter().map(|name| FormField::new(*name)).collect(),
        }
    }
}

impl FormValues {
    pub fn field(&self, name: FieldName) -> &FormField {
        // One entry per FieldName, in declaration order
        &self.fields[name as usize]
    }

    pub fn get(&self, name: FieldName) -> &str {
        self.field(name).as_text()
    }

    pub fn set(&mut self, name: FieldName, value: String) {
        self.fields[name as usize].set_text(value);
    }

    pub fn topic(&self) -> Topic {
        Topic::from_value(self.get(FieldName::SurveyTopic))
    }

    /// Owned copy of every value, keyed by field
    pub fn to_map(&self) -> BTreeMap<FieldName, String> {
        self.fields
            .iter()
            .map(|field| (field.name(), field.as_text().to_string()))
            .collect()
    }
}

/// Holds current values, errors and submission status for one form session
#[derive(Debug, Clone)]
pub struct FormStateStore {
    values: FormValues,
    errors: ErrorMap,
    phase: SubmissionPhase,
    active: Vec<FieldName>,
    active_field_index: usize,
}

impl FormStateStore {
    pub fn new() -> Self {
        Self {
            values: FormValues::default(),
            errors: ErrorMap::default(),
            phase: SubmissionPhase::default(),
            active: active_fields(Topic::Unselected),
            active_field_index: 0,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn topic(&self) -> Topic {
        self.values.topic()
    }

    /// Fields visible for the current topic, in render order
    pub fn active_fields(&self) -> &[FieldName] {
        &self.active
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: SubmissionPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "submission phase change");
        self.phase = phase;
    }

    /// Errors from the last validation pass. Empty until the first one.
    pub fn current_errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: ErrorMap) {
        self.errors = errors;
    }

    /// Run validation now and keep the result
    pub fn revalidate(&mut self) -> &ErrorMap {
        self.errors = validate(&self.values);
        &self.errors
    }

    /// Overwrite a field value.
    ///
    /// Returns the new topic when this edit changed the survey topic to a
    /// selectable value, which is the only case that should start a
    /// supplementary question fetch.
    pub fn apply_change(&mut self, name: FieldName, value: impl Into<String>) -> Option<Topic> {
        let previous_topic = self.topic();
        self.values.set(name, value.into());

        if matches!(
            self.phase,
            SubmissionPhase::ErrorsShown | SubmissionPhase::Summarized
        ) {
            self.set_phase(SubmissionPhase::Editing);
        }

        if name != FieldName::SurveyTopic {
            return None;
        }

        let topic = self.topic();
        if topic == previous_topic {
            return None;
        }

        self.refresh_active_fields(topic);
        tracing::debug!(from = %previous_topic, to = %topic, "survey topic changed");
        topic.is_selected().then_some(topic)
    }

    /// Same as `apply_change`, for event sources that name fields by string
    pub fn apply_named_change(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<Topic>, FormError> {
        let name: FieldName = name.parse()?;
        Ok(self.apply_change(name, value))
    }

    /// Field that currently has focus
    pub fn focused(&self) -> Option<FieldName> {
        self.active.get(self.active_field_index).copied()
    }

    fn refresh_active_fields(&mut self, topic: Topic) {
        let focused = self.focused();
        self.active = active_fields(topic);
        self.active_field_index = focused
            .and_then(|name| self.active.iter().position(|n| *n == name))
            .unwrap_or_else(|| self.active_field_index.min(self.active.len().saturating_sub(1)));
    }
}

impl Default for FormStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for FormStateStore {
    fn field_count(&self) -> usize {
        self.active.len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.active.len().saturating_sub(1));
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.active.get(index).map(|name| self.values.field(*name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod form_values {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_defaults_are_empty() {
            let values = FormValues::default();
            for name in FieldName::ALL {
                assert_eq!(values.get(name), "");
            }
            assert_eq!(values.topic(), Topic::Unselected);
        }

        #[test]
        fn test_to_map_has_every_field() {
            let mut values = FormValues::default();
            values.set(FieldName::Email, "a@b.c".to_string());
            let map = values.to_map();
            assert_eq!(map.len(), FieldName::ALL.len());
            assert_eq!(map[&FieldName::Email], "a@b.c");
        }
    }

    mod apply_change {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_store_shows_base_fields() {
            let store = FormStateStore::new();
            assert_eq!(store.active_fields(), active_fields(Topic::Unselected).as_slice());
            assert_eq!(store.phase(), SubmissionPhase::Editing);
            assert!(store.current_errors().is_empty());
        }

        #[test]
        fn test_plain_edit_does_not_request_fetch() {
            let mut store = FormStateStore::new();
            assert_eq!(store.apply_change(FieldName::FullName, "Ada"), None);
            assert_eq!(store.values().get(FieldName::FullName), "Ada");
        }

        #[test]
        fn test_topic_change_requests_fetch() {
            let mut store = FormStateStore::new();
            assert_eq!(
                store.apply_change(FieldName::SurveyTopic, "Health"),
                Some(Topic::Health)
            );
            assert!(store.active_fields().contains(&FieldName::DietPreference));
            assert!(!store.active_fields().contains(&FieldName::FavoriteLanguage));
        }

        #[test]
        fn test_same_topic_does_not_request_fetch() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::SurveyTopic, "Health");
            assert_eq!(store.apply_change(FieldName::SurveyTopic, "Health"), None);
        }

        #[test]
        fn test_clearing_topic_does_not_request_fetch() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::SurveyTopic, "Health");
            assert_eq!(store.apply_change(FieldName::SurveyTopic, ""), None);
            assert_eq!(store.active_fields(), active_fields(Topic::Unselected).as_slice());
        }

        #[test]
        fn test_topic_switch_retains_inactive_values() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::SurveyTopic, "Technology");
            store.apply_change(FieldName::FavoriteLanguage, "Python");

            store.apply_change(FieldName::SurveyTopic, "Health");
            assert!(!store.active_fields().contains(&FieldName::FavoriteLanguage));
            assert_eq!(store.values().get(FieldName::FavoriteLanguage), "Python");

            store.apply_change(FieldName::SurveyTopic, "Technology");
            assert!(store.active_fields().contains(&FieldName::FavoriteLanguage));
            assert_eq!(store.values().get(FieldName::FavoriteLanguage), "Python");
        }

        #[test]
        fn test_named_change() {
            let mut store = FormStateStore::new();
            assert_eq!(
                store.apply_named_change("surveyTopic", "Education"),
                Ok(Some(Topic::Education))
            );
            assert_eq!(
                store.apply_named_change("nickname", "x"),
                Err(FormError::UnknownField("nickname".to_string()))
            );
        }

        #[test]
        fn test_edit_after_errors_returns_to_editing() {
            let mut store = FormStateStore::new();
            store.set_phase(SubmissionPhase::ErrorsShown);
            store.apply_change(FieldName::FullName, "Ada");
            assert_eq!(store.phase(), SubmissionPhase::Editing);
        }

        #[test]
        fn test_edit_after_summary_returns_to_editing() {
            let mut store = FormStateStore::new();
            store.set_phase(SubmissionPhase::Summarized);
            store.apply_change(FieldName::Feedback, "more");
            assert_eq!(store.phase(), SubmissionPhase::Editing);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_edits_do_not_validate() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::Email, "bad");
            assert!(store.current_errors().is_empty());
        }

        #[test]
        fn test_revalidate_replaces_errors_wholesale() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::SurveyTopic, "Technology");
            assert!(store.revalidate().get(FieldName::FavoriteLanguage).is_some());

            store.apply_change(FieldName::SurveyTopic, "Health");
            let errors = store.revalidate();
            assert!(errors.get(FieldName::FavoriteLanguage).is_none());
            assert!(errors.get(FieldName::ExerciseFrequency).is_some());
        }
    }

    mod focus {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_next_field_cycles_active_fields() {
            let mut store = FormStateStore::new();
            for _ in 0..store.field_count() {
                store.next_field();
            }
            assert_eq!(store.active_field(), 0);
        }

        #[test]
        fn test_prev_field_wraps_to_last() {
            let mut store = FormStateStore::new();
            store.prev_field();
            assert_eq!(store.focused(), Some(FieldName::Feedback));
        }

        #[test]
        fn test_focus_follows_topic_field_across_switch() {
            let mut store = FormStateStore::new();
            store.set_active_field(2);
            assert_eq!(store.focused(), Some(FieldName::SurveyTopic));
            store.apply_change(FieldName::SurveyTopic, "Education");
            assert_eq!(store.focused(), Some(FieldName::SurveyTopic));
        }

        #[test]
        fn test_focus_clamps_when_field_disappears() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::SurveyTopic, "Technology");
            // Focus on yearsOfExperience, the last conditional field
            store.set_active_field(4);
            assert_eq!(store.focused(), Some(FieldName::YearsOfExperience));
            store.apply_change(FieldName::SurveyTopic, "");
            assert!(store.focused().is_some());
            assert!(store.active_field() < store.field_count());
        }

        #[test]
        fn test_get_field_follows_active_set() {
            let mut store = FormStateStore::new();
            store.apply_change(FieldName::SurveyTopic, "Health");
            assert_eq!(
                store.get_field(3).map(|f| f.name()),
                Some(FieldName::ExerciseFrequency)
            );
            assert!(store.get_field(6).is_none());
        }
    }
}
