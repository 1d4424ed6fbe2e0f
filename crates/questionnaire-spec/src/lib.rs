#![allow(missing_docs)]

pub mod answers;
pub mod error;
pub mod skip;
pub mod spec;
pub mod validate;

pub use answers::{Answer, AnswerMap, ValidationError};
pub use error::SpecError;
pub use skip::resolve;
pub use spec::{FieldType, Question, QuestionnaireKind, QuestionnaireSpec, SkipAction, SkipRule};
pub use validate::{validate_answers, validate_spec};

/// JSON Schema describing questionnaire definition files.
pub fn definition_schema() -> schemars::Schema {
    schemars::schema_for!(spec::QuestionnaireSpec)
}
