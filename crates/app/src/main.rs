use std::fmt;
use std::path::PathBuf;

use chrono::Duration;
use services::{AppServices, Clock, ProfileOrigin, resolve_question_bank};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wellness_core::model::{ProfileEdits, parse_age};

mod terminal;

const DEFAULT_DB_URL: &str = "sqlite://wellness.sqlite3";
const MAX_AUTO_ADVANCE_MS: i64 = 60_000;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidAutoAdvance { raw: String },
    NothingToEdit,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAutoAdvance { raw } => {
                write!(f, "invalid --auto-advance-ms value: {raw}")
            }
            ArgsError::NothingToEdit => write!(f, "edit needs --name and/or --age"),
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
    eprintln!("  cargo run -p app -- quiz    [--db <sqlite_url>] [--bank <path>] [--auto-advance-ms <ms>]");
    eprintln!("  cargo run -p app -- profile [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- edit    [--db <sqlite_url>] [--name <name>] [--age <age>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --auto-advance-ms 500  (0 disables, at most {MAX_AUTO_ADVANCE_MS})");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  WELLNESS_DB_URL, WELLNESS_AUTO_ADVANCE_MS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Profile,
    Edit,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "profile" => Some(Self::Profile),
            "edit" => Some(Self::Edit),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    bank_path: Option<PathBuf>,
    auto_advance: Option<Duration>,
    edits: ProfileEdits,
}

impl Args {
    /// Defaults, overridden by whatever `env` returns for the `WELLNESS_*` keys.
    fn from_env(env: &impl Fn(&str) -> Option<String>) -> Result<Self, ArgsError> {
        let db_url = env("WELLNESS_DB_URL")
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let auto_advance = match env("WELLNESS_AUTO_ADVANCE_MS") {
            Some(raw) => parse_auto_advance(raw)?,
            None => Some(services::quiz::default_auto_advance_delay()),
        };
        Ok(Self {
            db_url,
            bank_path: None,
            auto_advance,
            edits: ProfileEdits::new(),
        })
    }

    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env(env)?;

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                (Command::Quiz, "--bank") => {
                    parsed.bank_path = Some(PathBuf::from(require_value(args, "--bank")?));
                }
                (Command::Quiz, "--auto-advance-ms") => {
                    parsed.auto_advance =
                        parse_auto_advance(require_value(args, "--auto-advance-ms")?)?;
                }
                (Command::Edit, "--name") => {
                    let name = require_value(args, "--name")?;
                    parsed.edits = parsed.edits.with_name(name.trim());
                }
                (Command::Edit, "--age") => {
                    let age = require_value(args, "--age")?;
                    parsed.edits = parsed.edits.with_age(parse_age(&age));
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Edit && parsed.edits.is_empty() {
            return Err(ArgsError::NothingToEdit);
        }
        Ok(parsed)
    }
}

/// `0` turns auto-advance off; anything above a minute is rejected.
fn parse_auto_advance(raw: String) -> Result<Option<Duration>, ArgsError> {
    let ms: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ArgsError::InvalidAutoAdvance { raw: raw.clone() })?;
    match ms {
        0 => Ok(None),
        1..=MAX_AUTO_ADVANCE_MS => Ok(Some(Duration::milliseconds(ms))),
        _ => Err(ArgsError::InvalidAutoAdvance { raw }),
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so they never interleave with the questionnaire on stdout.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1).peekable();

    let first = argv.peek().cloned();
    let cmd = match first.as_deref() {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => {
            let cmd = Command::from_arg(first).ok_or_else(|| {
                eprintln!("unknown subcommand: {first}");
                print_usage();
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
            })?;
            argv.next();
            cmd
        }
    };

    let process_env = |key: &str| std::env::var(key).ok();
    let parsed = Args::parse(cmd, &mut argv, &process_env).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Create the database file here; sqlx will not create it on connect.
    prepare_sqlite_file(&parsed.db_url)?;
    let bank = resolve_question_bank(parsed.bank_path.as_deref())?;
    let mut app = AppServices::new_sqlite(&parsed.db_url, Clock::System, bank)
        .await?
        .with_auto_advance(parsed.auto_advance);
    tracing::info!(db = %parsed.db_url, command = ?cmd, "wellness ready");

    if app.profiles().origin() == ProfileOrigin::Recovered {
        println!("Your saved profile could not be read and was reset.");
    }

    match cmd {
        Command::Quiz => terminal::run_quiz(&mut app).await,
        Command::Profile => {
            terminal::print_profile(app.profiles().profile());
            Ok(())
        }
        Command::Edit => {
            let profile = app.profiles_mut().apply_edits(parsed.edits).await?;
            println!("Profile updated.");
            terminal::print_profile(profile);
            Ok(())
        }
    }
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

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "wellness exited with an error");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(cmd: Command, args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(cmd, &mut iter, &no_env)
    }

    #[test]
    fn auto_advance_zero_disables() {
        assert_eq!(parse_auto_advance("0".into()).unwrap(), None);
        assert_eq!(
            parse_auto_advance("250".into()).unwrap(),
            Some(Duration::milliseconds(250))
        );
        assert!(parse_auto_advance("-1".into()).is_err());
        assert!(parse_auto_advance("soon".into()).is_err());
    }

    #[test]
    fn auto_advance_is_capped_at_one_minute() {
        assert_eq!(
            parse_auto_advance("60000".into()).unwrap(),
            Some(Duration::milliseconds(60_000))
        );
        assert!(matches!(
            parse_auto_advance("60001".into()),
            Err(ArgsError::InvalidAutoAdvance { .. })
        ));
        assert!(matches!(
            parse_auto_advance("10000000000000000".into()),
            Err(ArgsError::InvalidAutoAdvance { .. })
        ));
    }

    #[test]
    fn environment_supplies_defaults_and_flags_win() {
        let env = |key: &str| match key {
            "WELLNESS_DB_URL" => Some("sqlite::memory:".to_string()),
            "WELLNESS_AUTO_ADVANCE_MS" => Some("0".to_string()),
            _ => None,
        };
        let mut iter = ["--auto-advance-ms", "750"].into_iter().map(String::from);
        let args = Args::parse(Command::Quiz, &mut iter, &env).unwrap();

        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(args.auto_advance, Some(Duration::milliseconds(750)));

        let mut no_flags = std::iter::empty::<String>();
        let from_env_only = Args::parse(Command::Quiz, &mut no_flags, &env).unwrap();
        assert_eq!(from_env_only.auto_advance, None);
    }

    #[test]
    fn invalid_environment_value_is_reported() {
        let env = |key: &str| (key == "WELLNESS_AUTO_ADVANCE_MS").then(|| "soon".to_string());
        let mut iter = std::iter::empty::<String>();
        assert!(matches!(
            Args::parse(Command::Profile, &mut iter, &env),
            Err(ArgsError::InvalidAutoAdvance { .. })
        ));
    }

    #[test]
    fn missing_environment_uses_defaults() {
        let args = parse(Command::Quiz, &[]).unwrap();
        assert_eq!(args.db_url, DEFAULT_DB_URL);
        assert_eq!(
            args.auto_advance,
            Some(services::quiz::default_auto_advance_delay())
        );
    }

    #[test]
    fn edit_collects_name_and_lenient_age() {
        let args = parse(Command::Edit, &["--name", " Asha ", "--age", "thirty"]).unwrap();
        assert_eq!(
            args.edits,
            ProfileEdits::new().with_name("Asha").with_age(None)
        );
    }

    #[test]
    fn edit_without_fields_is_rejected() {
        assert!(matches!(
            parse(Command::Edit, &[]),
            Err(ArgsError::NothingToEdit)
        ));
    }

    #[test]
    fn flags_are_scoped_to_their_command() {
        assert!(matches!(
            parse(Command::Profile, &["--name", "x"]),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(matches!(
            parse(Command::Quiz, &["--bank"]),
            Err(ArgsError::MissingValue { flag: "--bank" })
        ));
    }

    #[test]
    fn sqlite_urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        let url = normalize_sqlite_url("data/w.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/w.sqlite3"));
    }
}
