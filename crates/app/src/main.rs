mod render;

use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use flash_core::model::{DeckSettings, OverrideField};
use services::{CardSourceService, DeckDriver, DeckHandle};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidRevealSecs { raw: String },
    InvalidSeed { raw: String },
    InvalidField { raw: String },
    MissingField,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidRevealSecs { raw } => {
                write!(f, "invalid --reveal-secs value (expected 5..=600): {raw}")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidField { raw } => write!(
                f,
                "unknown setting {raw} (expected governor, capital, senator or representative)"
            ),
            ArgsError::MissingField => write!(f, "set requires a setting name"),
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
    eprintln!(
        "  app study [--bank <path>] [--db <sqlite_url>] [--reveal-secs <n>] \
         [--no-auto-reveal] [--seed <n>]"
    );
    eprintln!(
        "  app set <governor|capital|senator|representative> <value...> [--db <sqlite_url>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank data/questions.json");
    eprintln!("  --db sqlite:flash.sqlite3");
    eprintln!("  --reveal-secs 30");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FLASH_BANK_PATH, FLASH_DB_URL, FLASH_REVEAL_SECS, FLASH_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Study,
    Set,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "study" => Some(Self::Study),
            "set" => Some(Self::Set),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    bank_path: PathBuf,
    settings: DeckSettings,
    seed: Option<u64>,
    assignment: Option<(OverrideField, String)>,
}

impl Args {
    fn defaults() -> Self {
        let db_url = std::env::var("FLASH_DB_URL").map_or_else(
            |_| normalize_sqlite_url("sqlite:flash.sqlite3".into()),
            normalize_sqlite_url,
        );
        let bank_path = std::env::var("FLASH_BANK_PATH")
            .map_or_else(|_| PathBuf::from("data/questions.json"), PathBuf::from);
        Self {
            db_url,
            bank_path,
            settings: DeckSettings::default(),
            seed: None,
            assignment: None,
        }
    }

    fn parse_db_flag(&mut self, args: &mut impl Iterator<Item = String>) -> Result<(), ArgsError> {
        let value = require_value(args, "--db")?;
        if value.trim().is_empty() {
            return Err(ArgsError::InvalidDbUrl { raw: value });
        }
        self.db_url = normalize_sqlite_url(value);
        Ok(())
    }

    fn parse_study(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        Self::parse_study_with(args, std::env::var("FLASH_REVEAL_SECS").ok())
    }

    /// `env_reveal_secs` is the `FLASH_REVEAL_SECS` value, if set.
    fn parse_study_with(
        args: &mut impl Iterator<Item = String>,
        env_reveal_secs: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self::defaults();
        let mut auto_reveal = parsed.settings.auto_reveal_enabled();
        let mut reveal_secs = env_reveal_secs
            .unwrap_or_else(|| parsed.settings.auto_reveal_secs().to_string());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => parsed.parse_db_flag(args)?,
                "--bank" => parsed.bank_path = PathBuf::from(require_value(args, "--bank")?),
                "--reveal-secs" => reveal_secs = require_value(args, "--reveal-secs")?,
                "--no-auto-reveal" => auto_reveal = false,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.seed = Some(seed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        parsed.settings = parse_settings(auto_reveal, &reveal_secs)?;
        Ok(parsed)
    }

    fn parse_set(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::defaults();
        let mut field = None;
        let mut words = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => parsed.parse_db_flag(args)?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if field.is_none() => {
                    let parsed_field = arg
                        .parse::<OverrideField>()
                        .map_err(|_| ArgsError::InvalidField { raw: arg.clone() })?;
                    field = Some(parsed_field);
                }
                _ => words.push(arg),
            }
        }

        let field = field.ok_or(ArgsError::MissingField)?;
        parsed.assignment = Some((field, words.join(" ")));
        Ok(parsed)
    }
}

fn parse_settings(auto_reveal: bool, raw_secs: &str) -> Result<DeckSettings, ArgsError> {
    let invalid = || ArgsError::InvalidRevealSecs {
        raw: raw_secs.to_string(),
    };
    let secs = raw_secs.trim().parse::<u32>().map_err(|_| invalid())?;
    DeckSettings::new(auto_reveal, secs).map_err(|_| invalid())
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

fn init_logging() {
    let level = std::env::var("FLASH_LOG")
        .ok()
        .and_then(|raw| raw.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("flash.log") {
        let _ = WriteLogger::init(level, config, log_file);
    }
}

/// Reads commands from stdin and prints every snapshot change until quit or EOF.
async fn study(handle: DeckHandle) -> Result<(), Box<dyn std::error::Error>> {
    let mut updates = handle.subscribe();
    let count = handle.reload().await?;
    log::info!("study session started with {count} cards");
    println!("{}", render::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = render::render(&updates.borrow_and_update());
                println!("{text}");
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "n" | "next" => handle.advance()?,
                    "p" | "prev" => handle.retreat()?,
                    "r" | "reveal" | "" => handle.toggle_reveal()?,
                    "s" | "shuffle" => handle.reset_deck()?,
                    "l" | "reload" => {
                        let count = handle.reload().await?;
                        println!("reloaded {count} cards");
                    }
                    "q" | "quit" => break,
                    other => println!("unknown command {other:?}; {}", render::HELP),
                }
            }
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means study.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Study,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Study,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = match cmd {
        Command::Study => Args::parse_study(&mut iter),
        Command::Set => Args::parse_set(&mut iter),
    }
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url, parsed.bank_path.clone()).await?;
    let source = CardSourceService::from_storage(&storage);

    match cmd {
        Command::Study => {
            log::info!(
                "opening bank {} with settings at {}",
                parsed.bank_path.display(),
                parsed.db_url
            );
            let handle = DeckDriver::new(source)
                .with_settings(parsed.settings)
                .with_seed(parsed.seed)
                .spawn();
            study(handle).await
        }
        Command::Set => {
            let Some((field, value)) = parsed.assignment else {
                return Err(ArgsError::MissingField.into());
            };
            source.overrides().save_override(field, &value).await?;
            if value.trim().is_empty() {
                println!("cleared {field}");
            } else {
                println!("{field} = {}", value.trim());
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
