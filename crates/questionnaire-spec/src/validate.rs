use std::collections::BTreeSet;

use crate::answers::{Answer, AnswerMap, ValidationError};
use crate::error::SpecError;
use crate::spec::question::{FieldType, Question, SkipAction};
use crate::spec::questionnaire::QuestionnaireSpec;

/// Authoring-time validation of a questionnaire definition.
///
/// Catches the configuration faults that must never reach a live
/// respondent: duplicate identifiers, backward or dangling jump targets,
/// skip rules that do not line up with the declared choices, and skip
/// logic on fields that submit more than one value.
pub fn validate_spec(spec: &QuestionnaireSpec) -> Result<(), SpecError> {
    let mut seen = BTreeSet::new();
    for question in &spec.questions {
        if !seen.insert(question.clean_name.as_str()) {
            return Err(SpecError::DuplicateQuestion(question.clean_name.clone()));
        }
    }
    for (position, question) in spec.questions.iter().enumerate() {
        validate_skip_logic(spec, position, question)?;
    }
    Ok(())
}

fn validate_skip_logic(
    spec: &QuestionnaireSpec,
    position: usize,
    question: &Question,
) -> Result<(), SpecError> {
    if question.skip_logic.is_empty() {
        return Ok(());
    }
    if question.field_type.is_multi_value() {
        return Err(SpecError::SkipLogicOnMultiValue {
            question: question.clean_name.clone(),
        });
    }

    let declared: Vec<&str> = if question.field_type == FieldType::Checkbox {
        vec!["on", "off"]
    } else {
        question.choices.iter().map(String::as_str).collect()
    };

    // A lone checkbox's rules must cover the implicit pair exactly; other
    // fields may leave trailing choices to fall through.
    let aligned = if question.field_type == FieldType::Checkbox {
        question.skip_logic.len() == declared.len()
    } else {
        question.skip_logic.len() <= declared.len()
    };
    if !aligned {
        return Err(SpecError::MisalignedSkipLogic {
            question: question.clean_name.clone(),
        });
    }

    for (rule, choice) in question.skip_logic.iter().zip(&declared) {
        if rule.choice != *choice {
            // Value keying and positional indexing must agree: a rule that
            // names an undeclared value is a different fault than one that
            // names a declared value out of order.
            if !declared.contains(&rule.choice.as_str()) {
                return Err(SpecError::InvalidChoice {
                    question: question.clean_name.clone(),
                    value: rule.choice.clone(),
                });
            }
            return Err(SpecError::MisalignedSkipLogic {
                question: question.clean_name.clone(),
            });
        }

        if let SkipAction::Question { target } = &rule.action {
            match spec.question_position(target) {
                Some(target_position) if target_position > position => {}
                _ => {
                    return Err(SpecError::InvalidJumpTarget {
                        question: question.clean_name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Validate submitted answers against a set of questions.
///
/// Per-page validation passes the questions of the submitted page; the
/// stricter finalization re-check passes every question the skip-resolved
/// flow kept visible. An empty result means the answers are acceptable.
pub fn validate_answers(questions: &[Question], answers: &AnswerMap) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for question in questions {
        match answers.get(&question.clean_name) {
            None => {
                if question.required {
                    errors.push(required_error(question));
                }
            }
            Some(answer) => {
                if question.required && answer.is_empty() {
                    errors.push(required_error(question));
                } else if let Some(error) = validate_value(question, answer) {
                    errors.push(error);
                }
            }
        }
    }
    errors
}

fn validate_value(question: &Question, answer: &Answer) -> Option<ValidationError> {
    if !question.field_type.is_multi_value()
        && let Answer::Many(_) = answer
    {
        return Some(ValidationError::field(
            &question.clean_name,
            "expected a single value",
            "multi_value",
        ));
    }

    match question.field_type {
        FieldType::Text => None,
        FieldType::Checkbox => {
            let value = answer.as_single()?;
            if !value.is_empty() && question.choice_index(value).is_none() {
                return Some(ValidationError::field(
                    &question.clean_name,
                    "checkbox value must be boolean-like",
                    "invalid_checkbox",
                ));
            }
            None
        }
        FieldType::Checkboxes | FieldType::Radio | FieldType::Select | FieldType::Multiselect => {
            for value in answer.values() {
                if !value.is_empty() && !question.choices.iter().any(|choice| choice == value) {
                    return Some(ValidationError::field(
                        &question.clean_name,
                        format!("'{value}' is not one of the declared choices"),
                        "invalid_choice",
                    ));
                }
            }
            None
        }
    }
}

fn required_error(question: &Question) -> ValidationError {
    ValidationError::field(&question.clean_name, "this field is required", "required")
}
