use questionnaire_flow::{FlowError, finalize, score_quiz, tally_poll};
use questionnaire_spec::{
    Answer, AnswerMap, FieldType, Question, QuestionnaireKind, QuestionnaireSpec,
};

fn question(clean_name: &str, label: &str, correct_answer: Option<&str>) -> Question {
    Question {
        clean_name: clean_name.into(),
        label: label.into(),
        field_type: FieldType::Radio,
        choices: vec!["A".into(), "B".into(), "C".into(), "X".into()],
        required: true,
        default_value: None,
        help_text: None,
        page_break: false,
        skip_logic: vec![],
        correct_answer: correct_answer.map(str::to_string),
        feedback: None,
    }
}

fn spec(kind: QuestionnaireKind, questions: Vec<Question>) -> QuestionnaireSpec {
    QuestionnaireSpec {
        id: "fixture".into(),
        title: "Fixture".into(),
        kind,
        description: None,
        thank_you_text: None,
        allow_anonymous_submissions: true,
        allow_multiple_submissions: true,
        multi_step: false,
        submit_button_text: "Submit".into(),
        show_results: true,
        result_as_percentage: true,
        questions,
    }
}

fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), Answer::from(*value)))
        .collect()
}

#[test]
fn quiz_scoring_counts_verbatim_matches() {
    let quiz = spec(
        QuestionnaireKind::Quiz,
        vec![
            question("q1", "One", Some("A")),
            question("q2", "Two", Some("B")),
            question("q3", "Three", Some("C")),
        ],
    );
    let submitted = answers(&[("q1", "A"), ("q2", "X"), ("q3", "C")]);

    let result = score_quiz(&quiz, &submitted).unwrap();
    assert_eq!(result.total, 3);
    assert_eq!(result.total_correct, 2);
    assert!(result.per_question["q1"].is_correct);
    assert!(!result.per_question["q2"].is_correct);
    assert!(result.per_question["q3"].is_correct);
    assert_eq!(result.per_question["q2"].correct_answer, "B");
}

#[test]
fn unanswered_scored_question_counts_as_wrong() {
    let quiz = spec(
        QuestionnaireKind::Quiz,
        vec![question("q1", "One", Some("A"))],
    );
    let result = score_quiz(&quiz, &AnswerMap::new()).unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.total_correct, 0);
}

#[test]
fn questions_without_a_correct_answer_are_not_scored() {
    let quiz = spec(
        QuestionnaireKind::Quiz,
        vec![
            question("q1", "One", Some("A")),
            question("note", "Note", None),
        ],
    );
    let result = score_quiz(&quiz, &answers(&[("q1", "A"), ("note", "B")])).unwrap();
    assert_eq!(result.total, 1);
    assert!(!result.per_question.contains_key("note"));
}

#[test]
fn list_valued_answer_cannot_be_scored() {
    let quiz = spec(
        QuestionnaireKind::Quiz,
        vec![question("q1", "One", Some("A"))],
    );
    let mut submitted = AnswerMap::new();
    submitted.insert("q1".into(), Answer::Many(vec!["A".into(), "B".into()]));
    assert_eq!(
        score_quiz(&quiz, &submitted),
        Err(FlowError::MultiValueScore("q1".into()))
    );
}

#[test]
fn poll_percentages_follow_the_rounding_policy() {
    let poll = spec(
        QuestionnaireKind::Poll,
        vec![question("colour", "Favourite colour", None)],
    );
    let records: Vec<_> = ["A", "A", "B", "A"]
        .iter()
        .map(|value| finalize(&poll, answers(&[("colour", value)]), None))
        .collect();

    let results = tally_poll(&poll, &records, true);
    let stats = &results["Favourite colour"];
    assert_eq!(stats["A"], 75.0);
    assert_eq!(stats["B"], 25.0);
}

#[test]
fn poll_counts_when_percentage_mode_is_off() {
    let poll = spec(
        QuestionnaireKind::Poll,
        vec![question("colour", "Favourite colour", None)],
    );
    let records: Vec<_> = ["A", "B", "A"]
        .iter()
        .map(|value| finalize(&poll, answers(&[("colour", value)]), None))
        .collect();

    let results = tally_poll(&poll, &records, false);
    let stats = &results["Favourite colour"];
    assert_eq!(stats["A"], 2.0);
    assert_eq!(stats["B"], 1.0);
}

#[test]
fn list_answers_tally_as_one_composite_label() {
    let poll = spec(
        QuestionnaireKind::Poll,
        vec![question("colour", "Favourite colour", None)],
    );
    let mut picks = AnswerMap::new();
    picks.insert("colour".into(), Answer::Many(vec!["A".into(), "B".into()]));
    let records = vec![finalize(&poll, picks, None)];

    let results = tally_poll(&poll, &records, false);
    assert_eq!(results["Favourite colour"]["A, B"], 1.0);
}

#[test]
fn submissions_missing_a_question_key_are_skipped() {
    let poll = spec(
        QuestionnaireKind::Poll,
        vec![
            question("colour", "Favourite colour", None),
            question("animal", "Favourite animal", None),
        ],
    );
    // Two records predate the `animal` question.
    let records = vec![
        finalize(&poll, answers(&[("colour", "A")]), None),
        finalize(&poll, answers(&[("colour", "B")]), None),
        finalize(&poll, answers(&[("colour", "A"), ("animal", "C")]), None),
    ];

    let results = tally_poll(&poll, &records, false);
    assert_eq!(results["Favourite colour"]["A"], 2.0);
    assert_eq!(results["Favourite animal"]["C"], 1.0);
    assert_eq!(results["Favourite animal"].len(), 1);
}

#[test]
fn finalize_stamps_the_record() {
    let poll = spec(
        QuestionnaireKind::Poll,
        vec![question("colour", "Favourite colour", None)],
    );
    let record = finalize(&poll, answers(&[("colour", "A")]), Some("ada".into()));
    assert_eq!(record.questionnaire_id, "fixture");
    assert_eq!(record.respondent.as_deref(), Some("ada"));
    assert_eq!(record.answers["colour"], Answer::from("A"));

    let encoded = serde_json::to_string(&record).expect("serialize");
    let decoded: questionnaire_flow::SubmissionRecord =
        serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, record);
}
