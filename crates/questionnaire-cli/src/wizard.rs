use std::io::{self, BufRead, Write};

use questionnaire_flow::{
    FlowOutcome, MemoryAnswerStore, MemorySubmissionStore, RenderPage, StepFlowController,
    StepRequest, score_quiz,
};
use questionnaire_spec::{
    Answer, AnswerMap, FieldType, Question, QuestionnaireKind, QuestionnaireSpec,
};

const SESSION_TOKEN: &str = "local";

/// Drive the step flow one GET/POST cycle per page against in-memory
/// stores, prompting on stdin.
pub fn run(
    spec: &QuestionnaireSpec,
    respondent: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sessions = MemoryAnswerStore::new();
    let mut submissions = MemorySubmissionStore::new();
    let mut controller = StepFlowController::new(spec, &mut sessions, &mut submissions);

    println!("{}", spec.title);
    if let Some(description) = &spec.description {
        println!("{description}");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let opening = with_respondent(StepRequest::get(SESSION_TOKEN, None), &respondent);
    let (_, mut outcome) = controller.handle(&opening)?;

    loop {
        match outcome {
            FlowOutcome::Render(page) => {
                show_errors(&page);
                let answers = prompt_page(&page, &mut input)?;
                // The page was displayed as number n; its submission is
                // tagged n + 1 by convention.
                let step_tag = (page.number + 1).to_string();
                let post = with_respondent(
                    StepRequest::post(SESSION_TOKEN, &step_tag, answers),
                    &respondent,
                );
                outcome = controller.handle(&post)?.1;
            }
            FlowOutcome::ThankYou { submission } => {
                match &spec.thank_you_text {
                    Some(text) => println!("{text}"),
                    None => println!("Thank you for your submission."),
                }
                if spec.kind == QuestionnaireKind::Quiz {
                    let result = score_quiz(spec, &submission.answers)?;
                    println!("Score: {}/{}", result.total_correct, result.total);
                    for (name, score) in &result.per_question {
                        let verdict = if score.is_correct { "correct" } else { "wrong" };
                        let mut line = format!("  {name}: {verdict}");
                        if !score.is_correct {
                            line.push_str(&format!(" (expected {})", score.correct_answer));
                        }
                        if let Some(feedback) = &score.feedback {
                            line.push_str(&format!(" - {feedback}"));
                        }
                        println!("{line}");
                    }
                }
                return Ok(());
            }
            FlowOutcome::AlreadySubmitted => {
                println!("You have already submitted this questionnaire.");
                return Ok(());
            }
        }
    }
}

fn with_respondent(request: StepRequest, respondent: &Option<String>) -> StepRequest {
    match respondent {
        Some(name) => request.with_respondent(name),
        None => request,
    }
}

fn show_errors(page: &RenderPage) {
    for error in &page.errors {
        match &error.question_id {
            Some(question_id) => eprintln!("! {question_id}: {}", error.message),
            None => eprintln!("! {}", error.message),
        }
    }
}

fn prompt_page(page: &RenderPage, input: &mut impl BufRead) -> io::Result<AnswerMap> {
    println!("-- page {} --", page.number);
    let mut answers = AnswerMap::new();
    for question in &page.questions {
        if let Some(answer) = prompt_question(question, input)? {
            answers.insert(question.clean_name.clone(), answer);
        }
    }
    Ok(answers)
}

fn prompt_question(question: &Question, input: &mut impl BufRead) -> io::Result<Option<Answer>> {
    let mut prompt = question.label.clone();
    if question.required {
        prompt.push_str(" *");
    }
    if let Some(hint) = hint(question) {
        prompt.push(' ');
        prompt.push_str(&hint);
    }
    println!("{prompt}");
    if let Some(help) = &question.help_text {
        println!("  {help}");
    }
    print!("> ");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        // Blank input defers to the default when one exists; otherwise the
        // field stays unanswered and validation decides.
        return Ok(question
            .default_value
            .as_ref()
            .map(|value| Answer::One(value.clone())));
    }
    Ok(Some(parse_answer(question, trimmed)))
}

fn parse_answer(question: &Question, raw: &str) -> Answer {
    match question.field_type {
        FieldType::Checkbox => {
            let normalized = match raw.to_ascii_lowercase().as_str() {
                "y" | "yes" | "on" | "true" => "on",
                "n" | "no" | "off" | "false" => "off",
                _ => return Answer::One(raw.to_string()),
            };
            Answer::One(normalized.to_string())
        }
        kind if kind.is_multi_value() => Answer::Many(
            raw.split(',')
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
        ),
        _ => Answer::One(raw.to_string()),
    }
}

fn hint(question: &Question) -> Option<String> {
    match question.field_type {
        FieldType::Checkbox => Some("(yes/no)".to_string()),
        FieldType::Checkboxes | FieldType::Multiselect if !question.choices.is_empty() => Some(
            format!("({}; comma-separated)", question.choices.join("/")),
        ),
        FieldType::Radio | FieldType::Select if !question.choices.is_empty() => {
            Some(format!("({})", question.choices.join("/")))
        }
        _ => None,
    }
}
