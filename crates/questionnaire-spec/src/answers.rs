use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A submitted value: a single string, or a list for checkbox groups and
/// multiple selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

impl Answer {
    /// The value of a single-valued answer, `None` for lists.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Answer::One(value) => Some(value),
            Answer::Many(_) => None,
        }
    }

    /// Every submitted value, regardless of shape.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Answer::One(value) => vec![value.as_str()],
            Answer::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::One(value) => value.is_empty(),
            Answer::Many(values) => values.is_empty(),
        }
    }

    /// Display form: list answers are joined into one composite label, the
    /// way a checkbox group reads on screen.
    pub fn display_label(&self) -> String {
        match self {
            Answer::One(value) => value.clone(),
            Answer::Many(values) => values.join(", "),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::One(value.to_string())
    }
}

/// Accumulated answers keyed by question identifier.
pub type AnswerMap = BTreeMap<String, Answer>;

/// Recoverable per-field validation failure, rendered back to the
/// respondent next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// `None` for record-level failures that have no single field.
    pub question_id: Option<String>,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn field(question_id: &str, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            question_id: Some(question_id.to_string()),
            message: message.into(),
            code: code.into(),
        }
    }

    pub fn record(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
            code: code.into(),
        }
    }
}
