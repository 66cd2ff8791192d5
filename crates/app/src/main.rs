use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use services::{AppServices, Clock, StoreBackend, StoreSettings};
use tracing_subscriber::EnvFilter;

mod interactive;
mod render;

const DEFAULT_CATALOG: &str = "catalog/quizzes.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingQuizId,
    UnknownArg(String),
    InvalidStore { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingQuizId => write!(f, "take requires a quiz id"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidStore { raw } => {
                write!(f, "invalid --store value (expected memory, sqlite or rest): {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quizzes,
    Take { quiz_id: String },
    Dashboard,
}

struct Args {
    command: Command,
    catalog: PathBuf,
    name: Option<String>,
    store: StoreSettings,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz quizzes   [options]                 List available quizzes");
    eprintln!("  quiz take <quiz-id> [--name <name>] [options]");
    eprintln!("  quiz dashboard [options]                 Show per-learner progress");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --catalog <path>     Quiz catalog JSON (default: {DEFAULT_CATALOG})");
    eprintln!("  --store <backend>    memory | sqlite | rest (default: rest)");
    eprintln!("  --db <sqlite_url>    SQLite URL for --store sqlite (default: sqlite://quiz.sqlite3)");
    eprintln!("  --name <name>        Taker name for take (prompted when omitted)");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Environment (flags win):");
    eprintln!("  QUIZ_CATALOG, QUIZ_STORE, QUIZ_DB_URL, SUPABASE_URL, SUPABASE_ANON_KEY, RUST_LOG");
}

impl Args {
    fn parse(argv: impl IntoIterator<Item = String>, store: StoreSettings) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter();
        let mut catalog = std::env::var("QUIZ_CATALOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CATALOG), PathBuf::from);
        let mut name = None;
        let mut store = store;
        let mut command = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => catalog = PathBuf::from(require_value(&mut args, "--catalog")?),
                "--name" => name = Some(require_value(&mut args, "--name")?),
                "--store" => {
                    let value = require_value(&mut args, "--store")?;
                    store.backend = value
                        .parse::<StoreBackend>()
                        .map_err(|_| ArgsError::InvalidStore { raw: value.clone() })?;
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    store.db_url = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                "quizzes" | "list" if command.is_none() => command = Some(Command::Quizzes),
                "dashboard" if command.is_none() => command = Some(Command::Dashboard),
                "take" if command.is_none() => {
                    let quiz_id = args
                        .next()
                        .filter(|v| !v.starts_with("--"))
                        .ok_or(ArgsError::MissingQuizId)?;
                    command = Some(Command::Take { quiz_id });
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command: command.unwrap_or(Command::Quizzes),
            catalog,
            name,
            store,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn prompt_name(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<String> {
    write!(out, "Your name: ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = StoreSettings::from_env()?;
    let args = Args::parse(std::env::args().skip(1), settings).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let app = AppServices::open(&args.catalog, &args.store, Clock::system()).await?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Quizzes => {
            render::write_listings(&mut out, &app.quizzes().listings())?;
        }
        Command::Dashboard => {
            let dashboard = app.dashboard().load().await?;
            render::write_dashboard(&mut out, &dashboard)?;
        }
        Command::Take { quiz_id } => {
            if let Some(reason) = app.store().unavailable_reason() {
                tracing::warn!(%reason, "results will not be saved");
            }
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let name = match args.name {
                Some(name) => name,
                None => prompt_name(&mut input, &mut out)?,
            };

            let quizzes = app.quizzes();
            let mut session = quizzes.start(&quiz_id, &name)?;
            let done = interactive::take_quiz(&quizzes, &mut session, &mut input, &mut out)?;
            interactive::write_result(&mut out, &done)?;
            out.flush()?;

            if let Err(err) = done.persistence.outcome().await {
                tracing::warn!(error = %err, "your result could not be saved");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(argv.iter().map(|s| (*s).to_owned()), StoreSettings::default())
    }

    #[test]
    fn take_with_flags_in_any_order() {
        let args = parse(&["--store", "memory", "take", "quiz1", "--name", "Ann"]).unwrap();
        assert_eq!(
            args.command,
            Command::Take {
                quiz_id: "quiz1".into()
            }
        );
        assert_eq!(args.name.as_deref(), Some("Ann"));
        assert_eq!(args.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn defaults_to_listing_quizzes() {
        let args = parse(&["--db", "sqlite://x.sqlite3"]).unwrap();
        assert_eq!(args.command, Command::Quizzes);
        assert_eq!(args.store.db_url, "sqlite://x.sqlite3");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse(&["take"]), Err(ArgsError::MissingQuizId)));
        assert!(matches!(
            parse(&["--store", "mongo"]),
            Err(ArgsError::InvalidStore { .. })
        ));
        assert!(matches!(
            parse(&["dashboard", "extra"]),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(matches!(
            parse(&["--catalog"]),
            Err(ArgsError::MissingValue { flag: "--catalog" })
        ));
    }
}
