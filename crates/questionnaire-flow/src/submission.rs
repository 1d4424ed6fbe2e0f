use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use questionnaire_spec::{Answer, AnswerMap, QuestionnaireSpec};

use crate::error::FlowError;

/// Immutable record of one completed questionnaire run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub questionnaire_id: String,
    /// `None` for anonymous respondents.
    pub respondent: Option<String>,
    pub submit_time: DateTime<Utc>,
    pub answers: AnswerMap,
}

/// Build the persist-ready record for a validated answer set. Validation
/// happened upstream; this cannot fail.
pub fn finalize(
    spec: &QuestionnaireSpec,
    answers: AnswerMap,
    respondent: Option<String>,
) -> SubmissionRecord {
    SubmissionRecord {
        questionnaire_id: spec.id.clone(),
        respondent,
        submit_time: Utc::now(),
        answers,
    }
}

/// Scoring detail for one quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionScore {
    pub correct_answer: String,
    pub is_correct: bool,
    pub feedback: Option<String>,
}

/// Aggregate quiz result, attached to the render context rather than
/// stored: everything here derives from the answers already on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub per_question: BTreeMap<String, QuestionScore>,
    pub total: usize,
    pub total_correct: usize,
}

/// Score a finalized answer set against the questions that declare a
/// correct answer. Comparison is verbatim string equality; a list-valued
/// stored answer on a scored question is undefined and rejected.
pub fn score_quiz(spec: &QuestionnaireSpec, answers: &AnswerMap) -> Result<QuizResult, FlowError> {
    let mut per_question = BTreeMap::new();
    let mut total = 0;
    let mut total_correct = 0;

    for question in &spec.questions {
        let Some(correct) = &question.correct_answer else {
            continue;
        };
        let is_correct = match answers.get(&question.clean_name) {
            Some(Answer::Many(_)) => {
                return Err(FlowError::MultiValueScore(question.clean_name.clone()));
            }
            Some(Answer::One(value)) => value == correct,
            None => false,
        };
        total += 1;
        if is_correct {
            total_correct += 1;
        }
        per_question.insert(
            question.clean_name.clone(),
            QuestionScore {
                correct_answer: correct.clone(),
                is_correct,
                feedback: question.feedback.clone(),
            },
        );
    }

    Ok(QuizResult {
        per_question,
        total,
        total_correct,
    })
}

/// Per-question tally: question label to answer value to count (or
/// percentage when percentage mode is on).
pub type PollResults = BTreeMap<String, BTreeMap<String, f64>>;

/// Tally answers across every submission of a poll.
///
/// List answers are joined into one composite label before counting, the
/// way a checkbox group reads on screen. Records missing a question's key
/// predate an edit to the questions and are skipped for that question.
pub fn tally_poll(
    spec: &QuestionnaireSpec,
    records: &[SubmissionRecord],
    as_percentage: bool,
) -> PollResults {
    let mut results = PollResults::new();

    for record in records {
        for question in &spec.questions {
            let Some(answer) = record.answers.get(&question.clean_name) else {
                continue;
            };
            *results
                .entry(question.label.clone())
                .or_default()
                .entry(answer.display_label())
                .or_insert(0.0) += 1.0;
        }
    }

    if as_percentage && !records.is_empty() {
        let total = records.len() as f64;
        for stats in results.values_mut() {
            for count in stats.values_mut() {
                *count = round4(*count / total) * 100.0;
            }
        }
    }

    results
}

// Ratios are rounded to four decimal places before scaling to 100; result
// fixtures depend on this exact policy.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::round4;

    #[test]
    fn rounds_to_four_places() {
        assert_eq!(round4(1.0 / 3.0), 0.3333);
        assert_eq!(round4(2.0 / 3.0), 0.6667);
        assert_eq!(round4(0.75), 0.75);
    }
}
