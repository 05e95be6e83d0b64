//! Line commands and plain-text rendering for the console exam screen.

use std::fmt::{self, Write as _};

use exam_core::model::QuestionId;
use services::NavOutcome;
use ui::vm::{ExamFrameVm, ExamIntent, OptionVm, QuestionPanelVm, ResultVm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Intent(ExamIntent),
    /// Answer the question on screen.
    AnswerCurrent(u8),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidOption(String),
    InvalidQuestion(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Empty => write!(f, "empty command"),
            ConsoleError::Unknown(raw) => write!(f, "unknown command: {raw} (type h for help)"),
            ConsoleError::MissingArgument(what) => write!(f, "missing {what}"),
            ConsoleError::InvalidOption(raw) => write!(f, "invalid option: {raw}"),
            ConsoleError::InvalidQuestion(raw) => write!(f, "invalid question number: {raw}"),
        }
    }
}

impl std::error::Error for ConsoleError {}

pub const HELP: &str = "\
Commands:
  a <A-D>            answer the question on screen
  a <n> <A-D>        answer question n (block sub-questions)
  n / p              next / previous question (reading only)
  g <n>              go to question n (reading only)
  m                  toggle the review mark
  e                  audio finished playing (listening only)
  s / y / c          submit / confirm submit / cancel submit
  v                  show the current screen
  h                  this help
  q                  abandon the session";

/// Parses one input line.
///
/// # Errors
///
/// Returns `ConsoleError` for unknown commands or malformed arguments.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ConsoleError::Empty);
    };
    let args: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "a" | "answer" => match args.as_slice() {
            [option] => ConsoleCommand::AnswerCurrent(parse_option(option)?),
            [id, option] => ConsoleCommand::Intent(ExamIntent::Answer {
                id: parse_question(id)?,
                option: parse_option(option)?,
            }),
            _ => return Err(ConsoleError::MissingArgument("option")),
        },
        "n" | "next" => ConsoleCommand::Intent(ExamIntent::Next),
        "p" | "prev" => ConsoleCommand::Intent(ExamIntent::Prev),
        "g" | "goto" => {
            let raw = args.first().ok_or(ConsoleError::MissingArgument("question number"))?;
            ConsoleCommand::Intent(ExamIntent::GoTo(parse_question(raw)?))
        }
        "m" | "mark" => ConsoleCommand::Intent(ExamIntent::ToggleMark),
        "e" | "ended" => ConsoleCommand::Intent(ExamIntent::AudioEnded),
        "s" | "submit" => ConsoleCommand::Intent(ExamIntent::Submit),
        "y" | "yes" => ConsoleCommand::Intent(ExamIntent::ConfirmSubmit),
        "c" | "cancel" => ConsoleCommand::Intent(ExamIntent::CancelSubmit),
        "v" | "view" => ConsoleCommand::Show,
        "h" | "help" | "?" => ConsoleCommand::Help,
        "q" | "quit" => ConsoleCommand::Quit,
        other => return Err(ConsoleError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn parse_option(raw: &str) -> Result<u8, ConsoleError> {
    let invalid = || ConsoleError::InvalidOption(raw.to_string());
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            let upper = u8::try_from(letter.to_ascii_uppercase()).map_err(|_| invalid())?;
            Ok(upper - b'A')
        }
        _ => raw.parse::<u8>().map_err(|_| invalid()),
    }
}

fn parse_question(raw: &str) -> Result<QuestionId, ConsoleError> {
    raw.parse::<QuestionId>()
        .map_err(|_| ConsoleError::InvalidQuestion(raw.to_string()))
}

/// The question id `AnswerCurrent` applies to: the first answerable id on screen.
#[must_use]
pub fn current_answer_target(frame: &ExamFrameVm) -> Option<QuestionId> {
    frame.panel.answerable_ids().first().copied()
}

#[must_use]
pub fn describe_outcome(outcome: NavOutcome) -> Option<String> {
    match outcome {
        NavOutcome::Moved { to, .. } => Some(format!("-> question {to}")),
        NavOutcome::Applied => None,
        NavOutcome::Rejected(reason) => Some(format!("not allowed: {reason}")),
    }
}

fn render_options(out: &mut String, options: &[OptionVm]) {
    for option in options {
        let tick = if option.is_selected { "x" } else { " " };
        let _ = writeln!(out, "    [{tick}] {}. {}", option.letter, option.label);
    }
}

#[must_use]
pub fn render_frame(frame: &ExamFrameVm) -> String {
    let header = &frame.header;
    let mut out = String::new();
    let _ = write!(out, "== {} | time {}", header.section_label, header.total_timer);
    if let Some(listening) = &header.listening_timer {
        let _ = write!(out, " | listening {listening}");
    }
    let _ = writeln!(out, " | {}", header.progress_label);
    if let Some(notice) = header.notice {
        let _ = writeln!(out, "!! {notice}");
    }

    match &frame.panel {
        QuestionPanelVm::Listening {
            number_label,
            part_label,
            image_ref,
            audio_ref,
            audio_ended,
            is_marked,
            options,
            ..
        } => {
            let mark = if *is_marked { " (marked)" } else { "" };
            let _ = writeln!(out, "{number_label} - {part_label}{mark}");
            if let Some(image) = image_ref {
                let _ = writeln!(out, "  image: {image}");
            }
            let state = if *audio_ended { "ended" } else { "playing" };
            let _ = writeln!(out, "  audio: {audio_ref} ({state})");
            render_options(&mut out, options);
        }
        QuestionPanelVm::ReadingSingle {
            number_label,
            part_label,
            prompt,
            is_marked,
            options,
            ..
        } => {
            let mark = if *is_marked { " (marked)" } else { "" };
            let _ = writeln!(out, "{number_label} - {part_label}{mark}");
            let _ = writeln!(out, "  {prompt}");
            render_options(&mut out, options);
        }
        QuestionPanelVm::ReadingBlock {
            range_label,
            part_label,
            passage,
            questions,
        } => {
            let _ = writeln!(out, "{range_label} - {part_label}");
            let _ = writeln!(out, "  {passage}");
            for question in questions {
                let mark = if question.is_marked { " (marked)" } else { "" };
                let _ = writeln!(out, "  {}{mark}: {}", question.number_label, question.text);
                render_options(&mut out, &question.options);
            }
        }
    }

    if header.show_confirm_dialog {
        let _ = writeln!(out, "Submit the exam now? (y = confirm, c = cancel)");
    }
    out
}

#[must_use]
pub fn render_result(result: &ResultVm) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== Result #{} | {} at {} | time left {}",
        result.attempt_id, result.reason_label, result.submitted_at_str, result.time_left_label
    );
    for tally in std::iter::once(&result.overall)
        .chain(&result.sections)
        .chain(&result.parts)
    {
        let _ = write!(out, "{:<32} {:<18} {}", tally.title, tally.answered_label, tally.marked_label);
        if let Some(score) = &tally.score_label {
            let _ = write!(out, "  {score}");
        }
        out.push('\n');
    }
    if !result.marked_questions.is_empty() {
        let ids: Vec<String> = result.marked_questions.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "Marked for review: {}", ids.join(", "));
    }
    out
}
