use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use services::{AppServices, Clock, MenuEntry, Pacing, ProgressStore, ResetGate, Tutor};

mod catalog;
mod logging;
mod terminal;

use terminal::{StdinGate, TerminalSink};

const DEFAULT_DB_URL: &str = "sqlite://tutor.sqlite3";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command } => write!(f, "{command} is missing an operand"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { raw } => write!(f, "not a number: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [status]           [--db <sqlite_url>] [--catalog <path>]");
    eprintln!("  cargo run -p app -- menu               [--db <sqlite_url>] [--catalog <path>]");
    eprintln!("  cargo run -p app -- goto <group> <lesson>");
    eprintln!("  cargo run -p app -- level <n>");
    eprintln!("  cargo run -p app -- next | prev");
    eprintln!("  cargo run -p app -- reset [--yes]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --catalog (built-in)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_DB_URL, TUTOR_CATALOG, TUTOR_ADVANCE_DELAY_MS, TUTOR_HINT_DELAY_MS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Menu,
    Goto { group: i64, lesson: i64 },
    Level(i64),
    Next,
    Prev,
    Reset { confirmed: bool },
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    catalog: Option<PathBuf>,
    command: Command,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url =
            env("TUTOR_DB_URL").map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut catalog = env("TUTOR_CATALOG")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut confirmed = false;
        let mut name: Option<String> = None;
        let mut operands = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => {
                    catalog = Some(PathBuf::from(require_value(&mut args, "--catalog")?));
                }
                "--yes" | "-y" => confirmed = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if name.is_none() => name = Some(arg),
                _ => operands.push(arg),
            }
        }

        let mut operands = operands.into_iter();
        let command = match name.as_deref().unwrap_or("status") {
            "status" => Command::Status,
            "menu" => Command::Menu,
            "goto" => Command::Goto {
                group: number(operands.next(), "goto")?,
                lesson: number(operands.next(), "goto")?,
            },
            "level" => Command::Level(number(operands.next(), "level")?),
            "next" => Command::Next,
            "prev" => Command::Prev,
            "reset" => Command::Reset { confirmed },
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        };
        if let Some(extra) = operands.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            db_url,
            catalog,
            command,
        })
    }
}

fn number(raw: Option<String>, command: &'static str) -> Result<i64, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingOperand { command })?;
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { raw })
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
            .unwrap_or_else(|_| PathBuf::from("."))
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

fn print_menu(entries: &[MenuEntry]) {
    let mut group = None;
    for entry in entries {
        if group != Some(entry.pointer.group()) {
            group = Some(entry.pointer.group());
            println!("{}", entry.group_name);
        }
        let done = if entry.completed { "x" } else { " " };
        let here = if entry.current { " <" } else { "" };
        println!(
            "  [{done}] {:>2}. {}{here}",
            entry.ordinal, entry.lesson_name
        );
    }
}

fn print_status(store: &ProgressStore) {
    let catalog = store.catalog();
    println!();
    println!(
        "{} of {} lessons completed.",
        store.completion().completed_in(catalog),
        catalog.total_lessons()
    );
    if store.has_finished() {
        println!("The whole course is complete.");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;

    let draft = catalog::load(args.catalog.as_deref())?;

    // Open + migrate SQLite here so services never touch the filesystem layout.
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url, draft, Clock::default_clock()).await?;
    let sink = Arc::new(TerminalSink);
    let pacing = Pacing::from_env();

    let mut tutor = match args.command {
        Command::Status => services.start_tutor(sink, pacing).await?,
        _ => Tutor::new(services.progress_store().await, sink, pacing),
    };
    match args.command {
        Command::Status => print_status(tutor.store()),
        Command::Menu => print_menu(&tutor.lesson_menu()),
        Command::Goto { group, lesson } => {
            tutor.change_to(group, lesson).await?;
        }
        Command::Level(ordinal) => {
            tutor.jump_to_ordinal(ordinal).await?;
        }
        Command::Next => {
            tutor.next().await?;
        }
        Command::Prev => {
            tutor.previous().await?;
        }
        Command::Reset { confirmed } => {
            let assume_yes = |_: &str| true;
            let gate: &dyn ResetGate = if confirmed { &assume_yes } else { &StdinGate };
            if !tutor.reset(gate).await? {
                println!("Progress kept.");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
