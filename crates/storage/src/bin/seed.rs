use std::fmt;

use chrono::{DateTime, Duration, Utc};
use quiz_core::model::{NewResultRecord, QuizId};
use quiz_core::normalize_name;
use quiz_core::score::percentage;
use storage::SqliteRepository;

const SAMPLE_TAKERS: [&str; 4] = ["山田 太郎", "山田　太郎", "佐藤花子", "Alice Smith"];

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    quizzes: Vec<QuizId>,
    attempts: u32,
    total_questions: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAttempts { raw: String },
    InvalidQuestions { raw: String },
    InvalidQuizzes { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAttempts { raw } => write!(f, "invalid --attempts value: {raw}"),
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
            ArgsError::InvalidQuizzes { raw } => write!(f, "invalid --quizzes value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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

fn parse_quizzes(raw: &str) -> Result<Vec<QuizId>, ArgsError> {
    let ids: Vec<QuizId> = raw
        .split(',')
        .filter_map(|part| part.parse().ok())
        .collect();
    if ids.is_empty() {
        return Err(ArgsError::InvalidQuizzes { raw: raw.into() });
    }
    Ok(ids)
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite://quiz.sqlite3".into());
        let mut quizzes = parse_quizzes(
            &std::env::var("QUIZ_SEED_QUIZZES").unwrap_or_else(|_| "quiz1,quiz2,quiz3".into()),
        )?;
        let mut attempts = std::env::var("QUIZ_SEED_ATTEMPTS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(12);
        let mut total_questions = 10;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--quizzes" => {
                    let value = require_value(&mut args, "--quizzes")?;
                    quizzes = parse_quizzes(&value)?;
                }
                "--attempts" => {
                    let value = require_value(&mut args, "--attempts")?;
                    attempts = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidAttempts { raw: value.clone() })?;
                }
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    total_questions = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidQuestions { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
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
            quizzes,
            attempts,
            total_questions,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://quiz.sqlite3)");
    eprintln!("  --quizzes <a,b,...>       Quiz ids to spread attempts over (default: quiz1,quiz2,quiz3)");
    eprintln!("  --attempts <n>            Number of results to append (default: 12)");
    eprintln!("  --questions <n>           Questions per quiz (default: 10)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_SEED_QUIZZES, QUIZ_SEED_ATTEMPTS");
}

fn sample_result(args: &Args, i: u32) -> NewResultRecord {
    let i_usize = i as usize;
    let taker = SAMPLE_TAKERS[i_usize % SAMPLE_TAKERS.len()];
    let quiz_id = args.quizzes[i_usize % args.quizzes.len()].clone();
    let score = (i * 7 + 3) % (args.total_questions + 1);
    NewResultRecord {
        user_name: taker.to_owned(),
        normalized_user_name: normalize_name(taker),
        quiz_title: format!("Principles test {quiz_id}"),
        quiz_id,
        score,
        total_questions: args.total_questions,
        percentage: percentage(score, args.total_questions),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;
    let now = args.now.unwrap_or_else(Utc::now);

    for i in 0..args.attempts {
        let created_at = now - Duration::hours(i64::from(args.attempts - i));
        repo.insert_result_at(&sample_result(&args, i), created_at)
            .await?;
    }

    println!(
        "Seeded {} quiz results across {} quizzes into {}",
        args.attempts,
        args.quizzes.len(),
        args.db_url
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
