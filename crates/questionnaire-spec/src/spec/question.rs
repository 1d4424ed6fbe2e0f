use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Field widget kinds supported by the form builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Checkbox,
    Checkboxes,
    Radio,
    Select,
    Multiselect,
}

impl FieldType {
    /// Fields whose submitted value is a list rather than a single string.
    pub fn is_multi_value(&self) -> bool {
        matches!(self, FieldType::Checkboxes | FieldType::Multiselect)
    }
}

/// Branching decision bound to one choice of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SkipAction {
    /// Fall through to the next question in order.
    Next,
    /// Terminate the questionnaire, skipping everything that remains.
    End,
    /// Jump directly to a later question, skipping the ones in between.
    Question { target: String },
}

/// One skip-logic entry: the choice value it is bound to plus the action.
///
/// Entries must align positionally with the question's choice list (entry
/// `i` names choice `i`); [`crate::validate::validate_spec`] enforces the
/// alignment so value lookup and positional indexing always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkipRule {
    pub choice: String,
    pub action: SkipAction,
}

/// One form field definition. Immutable once a request cycle begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// Stable identifier, unique within the questionnaire.
    pub clean_name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Starts a new page when true (ignored on the first question).
    #[serde(default)]
    pub page_break: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_logic: Vec<SkipRule>,
    /// Quiz only: the expected answer, compared verbatim when scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Quiz only: feedback shown alongside the scored answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Question {
    /// True when any rule does something other than fall through.
    pub fn has_skipping(&self) -> bool {
        self.skip_logic
            .iter()
            .any(|rule| rule.action != SkipAction::Next)
    }

    /// Position of `value` in the declared choice list.
    ///
    /// Checkbox fields map boolean-like values to the implicit on/off pair:
    /// index 0 for checked, index 1 for unchecked.
    pub fn choice_index(&self, value: &str) -> Option<usize> {
        if self.field_type == FieldType::Checkbox {
            return match value {
                "on" | "true" => Some(0),
                "off" | "false" => Some(1),
                _ => None,
            };
        }
        self.choices.iter().position(|choice| choice == value)
    }
}
