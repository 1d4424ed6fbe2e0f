use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// The three questionnaire flavours share one definition shape; the kind
/// selects which post-submission processing applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireKind {
    Survey,
    Poll,
    Quiz,
}

fn default_true() -> bool {
    true
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

/// Top-level questionnaire definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionnaireSpec {
    pub id: String,
    pub title: String,
    pub kind: QuestionnaireKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thank_you_text: Option<String>,
    #[serde(default = "default_true")]
    pub allow_anonymous_submissions: bool,
    #[serde(default = "default_true")]
    pub allow_multiple_submissions: bool,
    /// Display one page per page-break group instead of everything at once.
    #[serde(default)]
    pub multi_step: bool,
    #[serde(default = "default_submit_label")]
    pub submit_button_text: String,
    /// Poll only: expose aggregated results to respondents.
    #[serde(default)]
    pub show_results: bool,
    /// Poll only: report tallies as percentages instead of raw counts.
    #[serde(default)]
    pub result_as_percentage: bool,
    pub questions: Vec<Question>,
}

impl QuestionnaireSpec {
    pub fn question(&self, clean_name: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.clean_name == clean_name)
    }

    /// Index of a question in the definition order; the order doubles as
    /// the jump-target space for skip logic.
    pub fn question_position(&self, clean_name: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|question| question.clean_name == clean_name)
    }

    pub fn has_page_breaks(&self) -> bool {
        self.questions
            .iter()
            .skip(1)
            .any(|question| question.page_break)
    }
}
