//! Declarative form questions
//!
//! A [`Question`] couples one answer slot with the rule deciding whether it is
//! shown and the rule deciding whether its answer is acceptable. Both rules
//! read the whole [`FormValues`] so a field can depend on another one (the
//! parental consent question only shows for minors, the performance length
//! limit follows the selected performance type).

use std::fmt;
use std::sync::Arc;
use super::value::{FieldValue, FormValues};

/// Validation rule for one answer
pub type Validator = Arc<dyn Fn(&FieldValue, &FormValues) -> bool + Send + Sync>;

/// Visibility rule for one question
pub type Visibility = Arc<dyn Fn(&FormValues) -> bool + Send + Sync>;

/// Widget the UI renders for a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    LongText,
    Number,
    SingleChoice(Vec<String>),
    MultiChoice(Vec<String>),
    /// Yes/No checkbox
    Checkbox,
    Upload,
    TimeSlots,
    /// Fixed number of text boxes
    TextGroup { size: usize },
}

/// One form field: answer slot, visibility rule and validator
#[derive(Clone)]
pub struct Question {
    name: String,
    label: String,
    kind: QuestionKind,
    validator: Validator,
    visibility: Visibility,
    vertical_position: i32,
    invalid: bool,
}

impl Question {
    /// Always visible, always valid until rules are attached
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            validator: Arc::new(|_, _| true),
            visibility: Arc::new(|_| true),
            vertical_position: 0,
            invalid: false,
        }
    }

    /// Attach a rule that only looks at this question's answer
    pub fn validate<F>(self, rule: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.validate_with(move |value, _| rule(value))
    }

    /// Attach a rule that may also look at other answers
    pub fn validate_with<F>(mut self, rule: F) -> Self
    where
        F: Fn(&FieldValue, &FormValues) -> bool + Send + Sync + 'static,
    {
        self.validator = Arc::new(rule);
        self
    }

    pub fn visible_when<F>(mut self, rule: F) -> Self
    where
        F: Fn(&FormValues) -> bool + Send + Sync + 'static,
    {
        self.visibility = Arc::new(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn is_visible(&self, values: &FormValues) -> bool {
        (self.visibility)(values)
    }

    /// Run the validator on this question's current answer
    pub fn validate_value(&self, values: &FormValues) -> bool {
        (self.validator)(values.get(&self.name), values)
    }

    /// Hidden questions never block submission
    pub fn effective_validate(&self, values: &FormValues) -> bool {
        if !self.is_visible(values) {
            return true;
        }
        self.validate_value(values)
    }

    /// Last laid-out offset, used to scroll to the first error
    pub fn vertical_position(&self) -> i32 {
        self.vertical_position
    }

    pub fn set_vertical_position(&mut self, position: i32) {
        self.vertical_position = position;
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("vertical_position", &self.vertical_position)
            .field("invalid", &self.invalid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_accept_anything() {
        let question = Question::new("notes", "Notes", QuestionKind::LongText);
        let values = FormValues::new();
        assert!(question.is_visible(&values));
        assert!(question.effective_validate(&values));
    }

    #[test]
    fn test_hidden_question_bypasses_validator() {
        let question = Question::new("consent", "Consent", QuestionKind::Checkbox)
            .validate(|_| false)
            .visible_when(|_| false);
        let values = FormValues::new();
        assert!(!question.validate_value(&values));
        assert!(question.effective_validate(&values));
    }

    #[test]
    fn test_validator_sees_other_answers() {
        let question = Question::new("confirmEmail", "Confirm email", QuestionKind::Text)
            .validate_with(|value, values| value == values.get("email"));
        let values = FormValues::new()
            .with("email", FieldValue::text("a@b.org"))
            .with("confirmEmail", FieldValue::text("a@b.org"));
        assert!(question.effective_validate(&values));

        let values = values.with("confirmEmail", FieldValue::text("x@b.org"));
        assert!(!question.effective_validate(&values));
    }
}
