//! Validation of the active field set
//!
//! `validate` is pure: it reads the current values, never the previous
//! errors, and always rebuilds the whole `ErrorMap`.

use super::form_state::FormValues;
use super::schema::{active_fields, rule, FieldName, Topic, ValidationRule};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

/// Field -> message for every active field that failed its rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMap(BTreeMap<FieldName, &'static str>);

impl ErrorMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: FieldName) -> Option<&'static str> {
        self.0.get(&name).copied()
    }

    /// Failing fields in render order
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }
}

/// Validate every active field of `values` and collect all failures in one pass
pub fn validate(values: &FormValues) -> ErrorMap {
    let topic = values.topic();
    let mut errors = BTreeMap::new();

    for name in active_fields(topic) {
        if let Some(message) = check(rule(name), values.get(name)) {
            errors.insert(name, message);
        }
    }

    tracing::debug!(topic = %topic, failures = errors.len(), "validated survey form");
    ErrorMap(errors)
}

/// Apply a single rule to a raw value
pub fn check(rule: ValidationRule, value: &str) -> Option<&'static str> {
    match rule {
        ValidationRule::Required { message } => value.is_empty().then_some(message),
        ValidationRule::Email { missing, invalid } => {
            if value.is_empty() {
                Some(missing)
            } else if !is_email_shaped(value) {
                Some(invalid)
            } else {
                None
            }
        }
        ValidationRule::TopicSelected { message } => {
            (!Topic::from_value(value).is_selected()).then_some(message)
        }
        ValidationRule::MinChars { min, message } => {
            (value.chars().count() < min).then_some(message)
        }
        ValidationRule::PositiveNumber { message } => {
            // Non-numeric input fails the same check as a non-positive number
            let positive = value
                .trim()
                .parse::<f64>()
                .is_ok_and(|n| n.is_finite() && n > 0.0);
            (!positive).then_some(message)
        }
    }
}

fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.as_ref().is_some_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::schema::FieldName::*;

    fn values(pairs: &[(FieldName, &str)]) -> FormValues {
        let mut values = FormValues::default();
        for (name, value) in pairs {
            values.set(*name, value.to_string());
        }
        values
    }

    fn valid_technology() -> FormValues {
        values(&[
            (FullName, "Ada Lovelace"),
            (Email, "ada@example.com"),
            (SurveyTopic, "Technology"),
            (FavoriteLanguage, "Python"),
            (YearsOfExperience, "3"),
            (Feedback, "x".repeat(50).as_str()),
        ])
    }

    fn failing(errors: &ErrorMap) -> Vec<FieldName> {
        errors.fields().collect()
    }

    mod whole_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_mixed_failures_are_all_collected() {
            let form = values(&[
                (FullName, ""),
                (Email, "bad"),
                (SurveyTopic, "Technology"),
                (FavoriteLanguage, ""),
                (YearsOfExperience, "0"),
                (Feedback, "short"),
            ]);
            let errors = validate(&form);
            assert_eq!(
                failing(&errors),
                vec![FullName, Email, FavoriteLanguage, YearsOfExperience, Feedback]
            );
            assert_eq!(errors.get(Email), Some("Email is invalid"));
        }

        #[test]
        fn test_valid_technology_form_has_no_errors() {
            assert!(validate(&valid_technology()).is_empty());
        }

        #[test]
        fn test_empty_form_reports_base_fields() {
            let errors = validate(&FormValues::default());
            assert_eq!(failing(&errors), vec![FullName, Email, SurveyTopic, Feedback]);
            assert_eq!(errors.get(Email), Some("Email is required"));
            assert_eq!(errors.get(SurveyTopic), Some("Survey Topic is required"));
        }

        #[test]
        fn test_validate_is_idempotent() {
            let form = values(&[(Email, "nope"), (SurveyTopic, "Health")]);
            assert_eq!(validate(&form), validate(&form));
        }

        #[test]
        fn test_inactive_invalid_values_are_ignored() {
            // Stale Technology values must not leak into a Health validation
            let mut form = valid_technology();
            form.set(YearsOfExperience, "-5".to_string());
            form.set(SurveyTopic, "Health".to_string());
            form.set(ExerciseFrequency, "Daily".to_string());
            form.set(DietPreference, "Vegan".to_string());
            assert!(validate(&form).is_empty());
        }

        #[test]
        fn test_health_requires_its_fields() {
            let mut form = valid_technology();
            form.set(SurveyTopic, "Health".to_string());
            assert_eq!(
                failing(&validate(&form)),
                vec![ExerciseFrequency, DietPreference]
            );
        }

        #[test]
        fn test_education_requires_its_fields() {
            let mut form = valid_technology();
            form.set(SurveyTopic, "Education".to_string());
            let errors = validate(&form);
            assert_eq!(failing(&errors), vec![HighestQualification, FieldOfStudy]);
            assert_eq!(errors.get(FieldOfStudy), Some("Field of Study is required"));
        }

        #[test]
        fn test_unknown_topic_counts_as_unselected() {
            let mut form = valid_technology();
            form.set(SurveyTopic, "Sports".to_string());
            assert_eq!(form.topic(), Topic::Unselected);
            assert_eq!(failing(&validate(&form)), vec![SurveyTopic]);
        }
    }

    mod rules {
        use super::*;
        use pretty_assertions::assert_eq;

        fn years(value: &str) -> Option<&'static str> {
            check(YearsOfExperience.spec().rule, value)
        }

        #[test]
        fn test_years_boundary_and_malformed_share_message() {
            let expected = Some("Years of Experience must be greater than 0");
            assert_eq!(years("-1"), expected);
            assert_eq!(years("abc"), expected);
            assert_eq!(years("0"), expected);
            assert_eq!(years(""), expected);
            assert_eq!(years("NaN"), expected);
        }

        #[test]
        fn test_years_accepts_positive_numbers() {
            assert_eq!(years("1"), None);
            assert_eq!(years("0.5"), None);
            assert_eq!(years(" 12 "), None);
        }

        #[test]
        fn test_feedback_length_counts_characters() {
            let rule = Feedback.spec().rule;
            assert!(check(rule, &"a".repeat(49)).is_some());
            assert!(check(rule, &"a".repeat(50)).is_none());
            // 50 multi-byte characters are more than 50 bytes but still 50 chars
            assert!(check(rule, &"é".repeat(49)).is_some());
            assert!(check(rule, &"é".repeat(50)).is_none());
        }

        #[test]
        fn test_email_shapes() {
            let rule = Email.spec().rule;
            assert_eq!(check(rule, ""), Some("Email is required"));
            assert_eq!(check(rule, "bad"), Some("Email is invalid"));
            assert_eq!(check(rule, "a@b"), Some("Email is invalid"));
            assert_eq!(check(rule, "a@b.c"), None);
            assert_eq!(check(rule, "first.last@sub.example.org"), None);
        }

        #[test]
        fn test_required_rule() {
            let rule = FullName.spec().rule;
            assert_eq!(check(rule, ""), Some("Full Name is required"));
            assert_eq!(check(rule, "x"), None);
        }
    }
}
