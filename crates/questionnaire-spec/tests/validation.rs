use questionnaire_spec::{
    Answer, AnswerMap, FieldType, Question, QuestionnaireKind, QuestionnaireSpec, SkipAction,
    SkipRule, SpecError, validate_answers, validate_spec,
};

fn question(clean_name: &str, field_type: FieldType, choices: &[&str]) -> Question {
    Question {
        clean_name: clean_name.into(),
        label: clean_name.into(),
        field_type,
        choices: choices.iter().map(|choice| choice.to_string()).collect(),
        required: false,
        default_value: None,
        help_text: None,
        page_break: false,
        skip_logic: vec![],
        correct_answer: None,
        feedback: None,
    }
}

fn spec_with(questions: Vec<Question>) -> QuestionnaireSpec {
    QuestionnaireSpec {
        id: "fixture".into(),
        title: "Fixture".into(),
        kind: QuestionnaireKind::Survey,
        description: None,
        thank_you_text: None,
        allow_anonymous_submissions: true,
        allow_multiple_submissions: true,
        multi_step: true,
        submit_button_text: "Submit".into(),
        show_results: false,
        result_as_percentage: false,
        questions,
    }
}

fn jump(choice: &str, target: &str) -> SkipRule {
    SkipRule {
        choice: choice.into(),
        action: SkipAction::Question {
            target: target.into(),
        },
    }
}

#[test]
fn accepts_forward_jumps() {
    let mut first = question("q1", FieldType::Radio, &["a", "b"]);
    first.skip_logic = vec![jump("a", "q3")];
    let spec = spec_with(vec![
        first,
        question("q2", FieldType::Text, &[]),
        question("q3", FieldType::Text, &[]),
    ]);
    assert_eq!(validate_spec(&spec), Ok(()));
}

#[test]
fn rejects_backward_and_self_jumps() {
    let mut second = question("q2", FieldType::Radio, &["a", "b"]);
    second.skip_logic = vec![jump("a", "q1")];
    let spec = spec_with(vec![question("q1", FieldType::Text, &[]), second.clone()]);
    assert_eq!(
        validate_spec(&spec),
        Err(SpecError::InvalidJumpTarget {
            question: "q2".into(),
            target: "q1".into(),
        })
    );

    let mut this = question("q1", FieldType::Radio, &["a", "b"]);
    this.skip_logic = vec![jump("a", "q1")];
    let spec = spec_with(vec![this]);
    assert!(matches!(
        validate_spec(&spec),
        Err(SpecError::InvalidJumpTarget { .. })
    ));
}

#[test]
fn rejects_unknown_jump_targets() {
    let mut first = question("q1", FieldType::Radio, &["a"]);
    first.skip_logic = vec![jump("a", "missing")];
    let spec = spec_with(vec![first]);
    assert!(matches!(
        validate_spec(&spec),
        Err(SpecError::InvalidJumpTarget { .. })
    ));
}

#[test]
fn rejects_misaligned_skip_rules() {
    let mut first = question("q1", FieldType::Radio, &["a", "b"]);
    // Declared values, wrong order.
    first.skip_logic = vec![
        SkipRule {
            choice: "b".into(),
            action: SkipAction::Next,
        },
        SkipRule {
            choice: "a".into(),
            action: SkipAction::Next,
        },
    ];
    let spec = spec_with(vec![first, question("q2", FieldType::Text, &[])]);
    assert_eq!(
        validate_spec(&spec),
        Err(SpecError::MisalignedSkipLogic {
            question: "q1".into()
        })
    );
}

#[test]
fn rejects_skip_rules_naming_undeclared_values() {
    let mut first = question("q1", FieldType::Radio, &["a", "b"]);
    first.skip_logic = vec![SkipRule {
        choice: "z".into(),
        action: SkipAction::Next,
    }];
    let spec = spec_with(vec![first]);
    assert_eq!(
        validate_spec(&spec),
        Err(SpecError::InvalidChoice {
            question: "q1".into(),
            value: "z".into(),
        })
    );
}

#[test]
fn checkbox_skip_logic_must_cover_the_on_off_pair() {
    let mut partial = question("subscribed", FieldType::Checkbox, &[]);
    partial.skip_logic = vec![SkipRule {
        choice: "on".into(),
        action: SkipAction::End,
    }];
    let spec = spec_with(vec![partial]);
    assert_eq!(
        validate_spec(&spec),
        Err(SpecError::MisalignedSkipLogic {
            question: "subscribed".into()
        })
    );

    let mut full = question("subscribed", FieldType::Checkbox, &[]);
    full.skip_logic = vec![
        SkipRule {
            choice: "on".into(),
            action: SkipAction::Next,
        },
        SkipRule {
            choice: "off".into(),
            action: SkipAction::End,
        },
    ];
    let spec = spec_with(vec![full]);
    assert_eq!(validate_spec(&spec), Ok(()));
}

#[test]
fn rejects_skip_logic_on_multi_value_fields() {
    let mut first = question("q1", FieldType::Checkboxes, &["a", "b"]);
    first.skip_logic = vec![SkipRule {
        choice: "a".into(),
        action: SkipAction::End,
    }];
    let spec = spec_with(vec![first]);
    assert_eq!(
        validate_spec(&spec),
        Err(SpecError::SkipLogicOnMultiValue {
            question: "q1".into()
        })
    );
}

#[test]
fn rejects_duplicate_question_names() {
    let spec = spec_with(vec![
        question("q1", FieldType::Text, &[]),
        question("q1", FieldType::Text, &[]),
    ]);
    assert_eq!(
        validate_spec(&spec),
        Err(SpecError::DuplicateQuestion("q1".into()))
    );
}

#[test]
fn missing_required_answer_is_reported() {
    let mut name = question("name", FieldType::Text, &[]);
    name.required = true;
    let errors = validate_answers(&[name], &AnswerMap::new());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "required");
    assert_eq!(errors[0].question_id.as_deref(), Some("name"));
}

#[test]
fn empty_required_answer_is_reported() {
    let mut name = question("name", FieldType::Text, &[]);
    name.required = true;
    let answers = AnswerMap::from([("name".to_string(), Answer::One(String::new()))]);
    let errors = validate_answers(&[name], &answers);
    assert_eq!(errors[0].code, "required");
}

#[test]
fn choice_membership_is_enforced() {
    let colour = question("colour", FieldType::Select, &["red", "blue"]);
    let answers = AnswerMap::from([("colour".to_string(), Answer::from("green"))]);
    let errors = validate_answers(&[colour], &answers);
    assert_eq!(errors[0].code, "invalid_choice");
}

#[test]
fn list_answer_on_single_value_field_is_rejected() {
    let colour = question("colour", FieldType::Radio, &["red", "blue"]);
    let answers = AnswerMap::from([(
        "colour".to_string(),
        Answer::Many(vec!["red".into(), "blue".into()]),
    )]);
    let errors = validate_answers(&[colour], &answers);
    assert_eq!(errors[0].code, "multi_value");
}

#[test]
fn list_answer_on_checkbox_group_is_accepted() {
    let tags = question("tags", FieldType::Checkboxes, &["a", "b", "c"]);
    let answers = AnswerMap::from([(
        "tags".to_string(),
        Answer::Many(vec!["a".into(), "c".into()]),
    )]);
    assert!(validate_answers(&[tags], &answers).is_empty());
}

#[test]
fn optional_questions_may_be_absent() {
    let note = question("note", FieldType::Text, &[]);
    assert!(validate_answers(&[note], &AnswerMap::new()).is_empty());
}

#[test]
fn definitions_round_trip_through_json() {
    let mut first = question("q1", FieldType::Radio, &["a", "b"]);
    first.skip_logic = vec![
        SkipRule {
            choice: "a".into(),
            action: SkipAction::Next,
        },
        SkipRule {
            choice: "b".into(),
            action: SkipAction::Question {
                target: "q3".into(),
            },
        },
    ];
    let spec = spec_with(vec![
        first,
        question("q2", FieldType::Text, &[]),
        question("q3", FieldType::Text, &[]),
    ]);
    let encoded = serde_json::to_string(&spec).expect("serialize");
    let decoded: QuestionnaireSpec = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, spec);
}
