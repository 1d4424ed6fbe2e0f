mod wizard;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use questionnaire_flow::{
    MemorySubmissionStore, SubmissionRecord, SubmissionStore, score_quiz, tally_poll,
};
use questionnaire_spec::{QuestionnaireKind, QuestionnaireSpec, definition_schema, validate_spec};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Run and inspect skip-logic questionnaires",
    long_about = "Validates questionnaire definitions, runs them page by page in a text shell, and aggregates stored submissions."
)]
struct Cli {
    /// Emit tracing output (RUST_LOG controls the filter).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a questionnaire definition for authoring errors.
    Validate {
        /// Path to the questionnaire JSON definition.
        #[arg(value_name = "SPEC")]
        spec: PathBuf,
    },
    /// Print the JSON Schema for questionnaire definitions.
    Schema,
    /// Fill in a questionnaire interactively, one page at a time.
    Run {
        /// Path to the questionnaire JSON definition.
        #[arg(value_name = "SPEC")]
        spec: PathBuf,
        /// Respondent identity; omit to answer anonymously.
        #[arg(long, value_name = "NAME")]
        respondent: Option<String>,
    },
    /// Aggregate stored submissions: poll tallies or quiz scores.
    Results {
        /// Path to the questionnaire JSON definition.
        #[arg(value_name = "SPEC")]
        spec: PathBuf,
        /// Path to a JSON array of submission records.
        #[arg(value_name = "SUBMISSIONS")]
        submissions: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }
    match cli.command {
        Command::Validate { spec } => run_validate(&spec),
        Command::Schema => run_schema(),
        Command::Run { spec, respondent } => run_questionnaire(&spec, respondent),
        Command::Results { spec, submissions } => run_results(&spec, &submissions),
    }
}

fn load_spec(path: &Path) -> CliResult<QuestionnaireSpec> {
    let raw = fs::read_to_string(path)?;
    let spec: QuestionnaireSpec = serde_json::from_str(&raw)?;
    validate_spec(&spec)?;
    Ok(spec)
}

fn run_validate(path: &Path) -> CliResult<()> {
    let spec = load_spec(path)?;
    println!(
        "{}: {} question(s), {} page(s), OK",
        spec.id,
        spec.questions.len(),
        if spec.multi_step && spec.has_page_breaks() {
            1 + spec
                .questions
                .iter()
                .skip(1)
                .filter(|question| question.page_break)
                .count()
        } else {
            1
        }
    );
    Ok(())
}

fn run_schema() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&definition_schema())?);
    Ok(())
}

fn run_questionnaire(path: &Path, respondent: Option<String>) -> CliResult<()> {
    let spec = load_spec(path)?;
    wizard::run(&spec, respondent)
}

fn run_results(spec_path: &Path, submissions_path: &Path) -> CliResult<()> {
    let spec = load_spec(spec_path)?;
    let raw = fs::read_to_string(submissions_path)?;
    let loaded: Vec<SubmissionRecord> = serde_json::from_str(&raw)?;

    // A submissions file may hold records for several questionnaires;
    // aggregation is scoped to the one being inspected.
    let mut store = MemorySubmissionStore::new();
    for record in loaded {
        store.append(record);
    }
    let records: Vec<SubmissionRecord> = store
        .for_questionnaire(&spec.id)
        .into_iter()
        .cloned()
        .collect();

    match spec.kind {
        QuestionnaireKind::Poll => {
            let results = tally_poll(&spec, &records, spec.result_as_percentage);
            let suffix = if spec.result_as_percentage { "%" } else { "" };
            for (label, stats) in &results {
                println!("{label}:");
                for (value, count) in stats {
                    println!("  {value}: {count}{suffix}");
                }
            }
        }
        QuestionnaireKind::Quiz => {
            for record in &records {
                let result = score_quiz(&spec, &record.answers)?;
                let who = record.respondent.as_deref().unwrap_or("anonymous");
                println!("{who}: {}/{}", result.total_correct, result.total);
            }
        }
        QuestionnaireKind::Survey => {
            println!("{} submission(s)", records.len());
        }
    }
    Ok(())
}
