use std::fmt;

use exam_core::{ExamConfig, QuestionCatalog};
use storage::JsonQuestionFile;
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    out: String,
    db_url: Option<String>,
    total_questions: Option<u32>,
    listening_questions: Option<u32>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOut { raw: String },
    InvalidDbUrl { raw: String },
    InvalidCount { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOut { raw } => write!(f, "invalid --out value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCount { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_count(value: String, flag: &'static str) -> Result<u32, ArgsError> {
    value
        .parse::<u32>()
        .map_err(|_| ArgsError::InvalidCount { flag, raw: value })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut out =
            std::env::var("EXAM_QUESTIONS_FILE").unwrap_or_else(|_| "questions.json".into());
        let mut db_url = std::env::var("EXAM_DB_URL").ok();
        let mut total_questions = None;
        let mut listening_questions = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => {
                    let value = require_value(&mut args, "--out")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidOut { raw: value });
                    }
                    out = value;
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    total_questions = Some(parse_count(value, "--questions")?);
                }
                "--listening" => {
                    let value = require_value(&mut args, "--listening")?;
                    listening_questions = Some(parse_count(value, "--listening")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            out,
            db_url,
            total_questions,
            listening_questions,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <path>              Question file to write (default: questions.json)");
    eprintln!("  --db <sqlite_url>         Also create and migrate this attempt database");
    eprintln!("  --questions <n>           Total question count (default: 200)");
    eprintln!("  --listening <n>           Listening question count (default: 100)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_QUESTIONS_FILE, EXAM_DB_URL, plus the EXAM_* exam settings");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = ExamConfig::from_env()?;
    if let Some(total) = args.total_questions {
        config.total_questions = total;
    }
    if let Some(listening) = args.listening_questions {
        config.listening_questions = listening;
        config.reading_start = listening + 1;
    }
    config.validate()?;

    let catalog = QuestionCatalog::sample(config)?;
    JsonQuestionFile::new(&args.out)
        .write(catalog.questions())
        .await?;

    if let Some(db_url) = &args.db_url {
        let _ = Storage::sqlite(db_url).await?;
        println!("Migrated attempt database {db_url}");
    }

    println!(
        "Wrote {} questions ({} ids) to {}",
        catalog.questions().len(),
        catalog.config().total_questions,
        args.out
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
