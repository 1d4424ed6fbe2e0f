use thiserror::Error;

/// Configuration-level faults in a questionnaire definition.
///
/// These surface during authoring validation; when one is hit at runtime it
/// means the respondent is working against tampered or stale data and the
/// request cannot be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("question '{0}' is declared more than once")]
    DuplicateQuestion(String),
    #[error("choice '{value}' is not declared for question '{question}'")]
    InvalidChoice { question: String, value: String },
    #[error("skip logic on '{question}' targets '{target}', which is not a later question")]
    InvalidJumpTarget { question: String, target: String },
    #[error("skip logic on '{question}' does not align with its declared choices")]
    MisalignedSkipLogic { question: String },
    #[error("skip logic is not supported on multi-value question '{question}'")]
    SkipLogicOnMultiValue { question: String },
}
