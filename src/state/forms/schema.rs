//! Static field schema for the survey form
//!
//! Every field, its activation condition and its validation rule live in
//! one table. Adding a topic or a conditional field is an edit to `SCHEMA`,
//! not new control flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when the event source names something outside the schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Survey topic selected by the respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Topic {
    #[default]
    Unselected,
    Technology,
    Health,
    Education,
}

impl Topic {
    /// Selectable topics, in display order
    pub const SELECTABLE: [Topic; 3] = [Topic::Technology, Topic::Health, Topic::Education];

    /// Parse a raw select value. Anything that is not a known topic counts
    /// as no selection.
    pub fn from_value(value: &str) -> Self {
        Self::SELECTABLE
            .into_iter()
            .find(|topic| topic.as_str() == value)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unselected => "",
            Self::Technology => "Technology",
            Self::Health => "Health",
            Self::Education => "Education",
        }
    }

    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::Unselected)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unselected => f.write_str("(unselected)"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Every field the form knows about, in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FullName,
    Email,
    SurveyTopic,
    FavoriteLanguage,
    YearsOfExperience,
    ExerciseFrequency,
    DietPreference,
    HighestQualification,
    FieldOfStudy,
    Feedback,
}

impl FieldName {
    pub const ALL: [FieldName; 10] = [
        FieldName::FullName,
        FieldName::Email,
        FieldName::SurveyTopic,
        FieldName::FavoriteLanguage,
        FieldName::YearsOfExperience,
        FieldName::ExerciseFrequency,
        FieldName::DietPreference,
        FieldName::HighestQualification,
        FieldName::FieldOfStudy,
        FieldName::Feedback,
    ];

    /// Wire name used by the event source
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::SurveyTopic => "surveyTopic",
            Self::FavoriteLanguage => "favoriteLanguage",
            Self::YearsOfExperience => "yearsOfExperience",
            Self::ExerciseFrequency => "exerciseFrequency",
            Self::DietPreference => "dietPreference",
            Self::HighestQualification => "highestQualification",
            Self::FieldOfStudy => "fieldOfStudy",
            Self::Feedback => "feedback",
        }
    }

    /// Schema entry for this field
    pub fn spec(&self) -> &'static FieldSpec {
        // SCHEMA is declared in the same order as the enum
        &SCHEMA[*self as usize]
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Input kind, used by the renderer and by the editing keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Choice(&'static [&'static str]),
    LongText,
}

/// When a field takes part in rendering and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Always,
    OnTopic(Topic),
}

impl Activation {
    pub fn matches(&self, topic: Topic) -> bool {
        match self {
            Activation::Always => true,
            Activation::OnTopic(t) => *t == topic,
        }
    }
}

/// Validation rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Non-empty value
    Required { message: &'static str },
    /// Non-empty and shaped like `local@domain.tld`
    Email {
        missing: &'static str,
        invalid: &'static str,
    },
    /// A selectable topic
    TopicSelected { message: &'static str },
    /// At least `min` characters
    MinChars { min: usize, message: &'static str },
    /// Numeric and strictly greater than zero
    PositiveNumber { message: &'static str },
}

/// One row of the schema
#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: &'static str,
    pub kind: FieldKind,
    pub activation: Activation,
    pub rule: ValidationRule,
}

/// Minimum feedback length, counted in characters
pub const MIN_FEEDBACK_CHARS: usize = 50;

const TOPIC_CHOICES: &[&str] = &["Technology", "Health", "Education"];
const LANGUAGE_CHOICES: &[&str] = &["JavaScript", "Python", "Java", "C#"];
const FREQUENCY_CHOICES: &[&str] = &["Daily", "Weekly", "Monthly", "Rarely"];
const DIET_CHOICES: &[&str] = &["Vegetarian", "Vegan", "Non-Vegetarian"];
const QUALIFICATION_CHOICES: &[&str] = &["High School", "Bachelor's", "Master's", "PhD"];

pub static SCHEMA: [FieldSpec; 10] = [
    FieldSpec {
        name: FieldName::FullName,
        label: "Full Name",
        kind: FieldKind::Text,
        activation: Activation::Always,
        rule: ValidationRule::Required {
            message: "Full Name is required",
        },
    },
    FieldSpec {
        name: FieldName::Email,
        label: "Email",
        kind: FieldKind::Text,
        activation: Activation::Always,
        rule: ValidationRule::Email {
            missing: "Email is required",
            invalid: "Email is invalid",
        },
    },
    FieldSpec {
        name: FieldName::SurveyTopic,
        label: "Survey Topic",
        kind: FieldKind::Choice(TOPIC_CHOICES),
        activation: Activation::Always,
        rule: ValidationRule::TopicSelected {
            message: "Survey Topic is required",
        },
    },
    FieldSpec {
        name: FieldName::FavoriteLanguage,
        label: "Favorite Programming Language",
        kind: FieldKind::Choice(LANGUAGE_CHOICES),
        activation: Activation::OnTopic(Topic::Technology),
        rule: ValidationRule::Required {
            message: "Favorite Programming Language is required",
        },
    },
    FieldSpec {
        name: FieldName::YearsOfExperience,
        label: "Years of Experience",
        kind: FieldKind::Number,
        activation: Activation::OnTopic(Topic::Technology),
        rule: ValidationRule::PositiveNumber {
            message: "Years of Experience must be greater than 0",
        },
    },
    FieldSpec {
        name: FieldName::ExerciseFrequency,
        label: "Exercise Frequency",
        kind: FieldKind::Choice(FREQUENCY_CHOICES),
        activation: Activation::OnTopic(Topic::Health),
        rule: ValidationRule::Required {
            message: "Exercise Frequency is required",
        },
    },
    FieldSpec {
        name: FieldName::DietPreference,
        label: "Diet Preference",
        kind: FieldKind::Choice(DIET_CHOICES),
        activation: Activation::OnTopic(Topic::Health),
        rule: ValidationRule::Required {
            message: "Diet Preference is required",
        },
    },
    FieldSpec {
        name: FieldName::HighestQualification,
        label: "Highest Qualification",
        kind: FieldKind::Choice(QUALIFICATION_CHOICES),
        activation: Activation::OnTopic(Topic::Education),
        rule: ValidationRule::Required {
            message: "Highest Qualification is required",
        },
    },
    FieldSpec {
        name: FieldName::FieldOfStudy,
        label: "Field of Study",
        kind: FieldKind::Text,
        activation: Activation::OnTopic(Topic::Education),
        rule: ValidationRule::Required {
            message: "Field of Study is required",
        },
    },
    FieldSpec {
        name: FieldName::Feedback,
        label: "Feedback",
        kind: FieldKind::LongText,
        activation: Activation::Always,
        rule: ValidationRule::MinChars {
            min: MIN_FEEDBACK_CHARS,
            message: "Feedback must be at least 50 characters",
        },
    },
];

/// Fields that are active for `topic`, in render order.
/// Base fields are always included.
pub fn active_fields(topic: Topic) -> Vec<FieldName> {
    SCHEMA
        .iter()
        .filter(|spec| spec.activation.matches(topic))
        .map(|spec| spec.name)
        .collect()
}

/// Validation rule for a field
pub fn rule(name: FieldName) -> ValidationRule {
    name.spec().rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn set(names: &[FieldName]) -> BTreeSet<FieldName> {
        names.iter().copied().collect()
    }

    mod active_fields {
        use super::*;
        use pretty_assertions::assert_eq;

        const BASE: [FieldName; 4] = [
            FieldName::FullName,
            FieldName::Email,
            FieldName::SurveyTopic,
            FieldName::Feedback,
        ];

        fn expected(extra: &[FieldName]) -> BTreeSet<FieldName> {
            let mut all = set(&BASE);
            all.extend(extra.iter().copied());
            all
        }

        #[test]
        fn test_unselected_is_base_only() {
            assert_eq!(set(&active_fields(Topic::Unselected)), expected(&[]));
        }

        #[test]
        fn test_technology_fields() {
            assert_eq!(
                set(&active_fields(Topic::Technology)),
                expected(&[FieldName::FavoriteLanguage, FieldName::YearsOfExperience])
            );
        }

        #[test]
        fn test_health_fields() {
            assert_eq!(
                set(&active_fields(Topic::Health)),
                expected(&[FieldName::ExerciseFrequency, FieldName::DietPreference])
            );
        }

        #[test]
        fn test_education_fields() {
            assert_eq!(
                set(&active_fields(Topic::Education)),
                expected(&[FieldName::HighestQualification, FieldName::FieldOfStudy])
            );
        }

        #[test]
        fn test_render_order_keeps_feedback_last() {
            let fields = active_fields(Topic::Health);
            assert_eq!(fields.first(), Some(&FieldName::FullName));
            assert_eq!(fields.last(), Some(&FieldName::Feedback));
        }

        #[test]
        fn test_unselected_matches_always_active_rows() {
            let always: Vec<FieldName> = SCHEMA
                .iter()
                .filter(|spec| spec.activation == Activation::Always)
                .map(|spec| spec.name)
                .collect();
            assert_eq!(active_fields(Topic::Unselected), always);
        }
    }

    mod field_name {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_schema_order_matches_enum() {
            for name in FieldName::ALL {
                assert_eq!(name.spec().name, name);
            }
        }

        #[test]
        fn test_parse_round_trips_wire_names() {
            for name in FieldName::ALL {
                assert_eq!(name.as_str().parse::<FieldName>(), Ok(name));
            }
        }

        #[test]
        fn test_parse_unknown_name() {
            assert_eq!(
                "shoeSize".parse::<FieldName>(),
                Err(FormError::UnknownField("shoeSize".to_string()))
            );
        }
    }

    mod topic {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_is_unselected() {
            assert_eq!(Topic::default(), Topic::Unselected);
            assert!(!Topic::default().is_selected());
        }

        #[test]
        fn test_from_value() {
            assert_eq!(Topic::from_value("Health"), Topic::Health);
            assert_eq!(Topic::from_value(""), Topic::Unselected);
            assert_eq!(Topic::from_value("Sports"), Topic::Unselected);
        }

        #[test]
        fn test_topic_choices_match_selectable() {
            let FieldKind::Choice(choices) = FieldName::SurveyTopic.spec().kind else {
                panic!("surveyTopic should be a choice field");
            };
            let selectable: Vec<&str> = Topic::SELECTABLE.iter().map(|t| t.as_str()).collect();
            assert_eq!(choices.to_vec(), selectable);
        }
    }

    #[test]
    fn test_rule_lookup() {
        assert_eq!(
            rule(FieldName::Feedback),
            ValidationRule::MinChars {
                min: 50,
                message: "Feedback must be at least 50 characters",
            }
        );
    }
}
