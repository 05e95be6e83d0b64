use std::fmt;
use std::sync::Arc;

use exam_core::{ExamConfig, QuestionCatalog};
use services::{AppServices, Clock, ExamSessionService};
use storage::repository::{QuestionSource, StaticQuestionSource};
use storage::JsonQuestionFile;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::vm::{
    ExamIntent, ExamSessionVm, map_attempt_history, map_exam_frame, map_result, start_exam,
};

mod console;

use console::{ConsoleCommand, HELP};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSeconds { flag: &'static str, raw: String },
    InvalidLimit { raw: String },
    InvalidAttemptId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSeconds { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
            ArgsError::InvalidAttemptId { raw } => write!(f, "invalid --id value: {raw}"),
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

fn parse_secs(value: String, flag: &'static str) -> Result<u32, ArgsError> {
    value
        .parse::<u32>()
        .map_err(|_| ArgsError::InvalidSeconds { flag, raw: value })
}

struct Args {
    db_url: String,
    questions_file: Option<String>,
    total_secs: Option<u32>,
    listening_secs: Option<u32>,
    limit: u32,
    attempt_id: Option<i64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run     [--db <sqlite_url>] [--questions <file>]");
    eprintln!("                              [--total-secs <n>] [--listening-secs <n>]");
    eprintln!("  cargo run -p app -- history [--db <sqlite_url>] [--limit <n>] [--id <attempt>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:exam.sqlite3");
    eprintln!("  --questions (built-in sample set)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_DB_URL, EXAM_QUESTIONS_FILE, EXAM_* exam settings, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("EXAM_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("exam.sqlite3".into()), normalize_sqlite_url);
        let mut questions_file = std::env::var("EXAM_QUESTIONS_FILE").ok();
        let mut total_secs = None;
        let mut listening_secs = None;
        let mut limit = 10;
        let mut attempt_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--questions" => {
                    questions_file = Some(require_value(args, "--questions")?);
                }
                "--total-secs" => {
                    let value = require_value(args, "--total-secs")?;
                    total_secs = Some(parse_secs(value, "--total-secs")?);
                }
                "--listening-secs" => {
                    let value = require_value(args, "--listening-secs")?;
                    listening_secs = Some(parse_secs(value, "--listening-secs")?);
                }
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    limit = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: value.clone() })?;
                }
                "--id" => {
                    let value = require_value(args, "--id")?;
                    attempt_id = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidAttemptId { raw: value.clone() })?,
                    );
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            questions_file,
            total_secs,
            listening_secs,
            limit,
            attempt_id,
        })
    }

    fn exam_config(&self) -> Result<ExamConfig, Box<dyn std::error::Error>> {
        let mut config = ExamConfig::from_env()?;
        if let Some(total) = self.total_secs {
            config.total_duration_secs = total;
        }
        if let Some(listening) = self.listening_secs {
            config.listening_duration_secs = listening;
        }
        config.validate()?;
        Ok(config)
    }

    fn question_source(
        &self,
        config: &ExamConfig,
    ) -> Result<Arc<dyn QuestionSource>, Box<dyn std::error::Error>> {
        match &self.questions_file {
            Some(path) => Ok(Arc::new(JsonQuestionFile::new(path))),
            None => {
                let sample = QuestionCatalog::sample(config.clone())?;
                Ok(Arc::new(StaticQuestionSource::new(sample.questions().to_vec())))
            }
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run_exam(sessions: &ExamSessionService) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = start_exam(sessions)
        .await
        .map_err(|err| std::io::Error::other(err.message()))?;
    println!("{}", console::render_frame(&screen.frame()));
    println!("{HELP}");

    let completed = drive_console(&screen).await?;
    if !completed {
        println!("Session abandoned; nothing was submitted.");
        return Ok(());
    }

    let result = screen
        .finish(sessions)
        .await
        .map_err(|err| std::io::Error::other(err.message()))?;
    println!("{}", console::render_result(&result));
    Ok(())
}

/// Feeds stdin commands to the session until it completes (`true`) or the
/// candidate quits (`false`).
async fn drive_console(screen: &ExamSessionVm) -> Result<bool, Box<dyn std::error::Error>> {
    let mut updates = screen.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_view = {
        let snapshot = updates.borrow_and_update();
        (snapshot.section, snapshot.show_transition_notice)
    };

    loop {
        let event = tokio::select! {
            line = lines.next_line() => ConsoleEvent::Line(line?),
            changed = updates.changed() => ConsoleEvent::Update { closed: changed.is_err() },
        };

        match event {
            ConsoleEvent::Line(None) => return Ok(false),
            ConsoleEvent::Line(Some(line)) => match console::parse_command(&line) {
                Ok(ConsoleCommand::Quit) => return Ok(false),
                Ok(ConsoleCommand::Help) => println!("{HELP}"),
                Ok(ConsoleCommand::Show) => println!("{}", console::render_frame(&screen.frame())),
                Ok(ConsoleCommand::AnswerCurrent(option)) => {
                    if let Some(id) = console::current_answer_target(&screen.frame()) {
                        dispatch(screen, ExamIntent::Answer { id, option }).await;
                    }
                }
                Ok(ConsoleCommand::Intent(intent)) => dispatch(screen, intent).await,
                Err(console::ConsoleError::Empty) => {}
                Err(err) => println!("{err}"),
            },
            ConsoleEvent::Update { closed: true } => return Ok(screen.snapshot().is_completed),
            ConsoleEvent::Update { closed: false } => {
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.is_completed {
                    return Ok(true);
                }
                let view = (snapshot.section, snapshot.show_transition_notice);
                if view != last_view {
                    last_view = view;
                    let frame = map_exam_frame(screen.catalog(), &snapshot);
                    println!("{}", console::render_frame(&frame));
                }
            }
        }
    }
}

enum ConsoleEvent {
    Line(Option<String>),
    Update { closed: bool },
}

async fn dispatch(screen: &ExamSessionVm, intent: ExamIntent) {
    match screen.dispatch(intent).await {
        Ok(outcome) => {
            if let Some(message) = console::describe_outcome(outcome) {
                println!("{message}");
            }
            if matches!(outcome, services::NavOutcome::Moved { .. })
                || matches!(intent, ExamIntent::Submit)
            {
                println!("{}", console::render_frame(&screen.frame()));
            }
        }
        Err(err) => println!("{}", err.message()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = parsed.exam_config()?;
    let questions = parsed.question_source(&config)?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, Clock::system(), config, questions).await?;
    info!(db = %parsed.db_url, "storage ready");

    match cmd {
        Command::Run => run_exam(&services.exam_sessions()).await,
        Command::History => {
            if let Some(id) = parsed.attempt_id {
                let submitted = services.exam_sessions().attempt_result(id).await?;
                println!("{}", console::render_result(&map_result(&submitted)));
                return Ok(());
            }
            let items = services
                .exam_sessions()
                .list_recent_attempts(parsed.limit)
                .await?;
            if items.is_empty() {
                println!("No attempts yet.");
            }
            for item in map_attempt_history(&items) {
                println!(
                    "#{:<4} {}  {:<12} {:<16} time left {}",
                    item.id,
                    item.submitted_at_str,
                    item.reason_label,
                    item.answered_label,
                    item.time_left_label
                );
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
