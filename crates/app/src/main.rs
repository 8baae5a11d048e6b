use std::fmt;
use std::sync::Arc;

use onboard_core::Clock;
use onboard_core::defaults::{default_catalog, default_resources};
use onboard_core::model::Catalog;
use services::ChecklistService;
use services::events::{ChecklistEvent, SelectedOption, TOGGLE_ACTION_PREFIX};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingUser,
    MissingGroup,
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingUser => write!(f, "--user is required (or set ONBOARD_USER)"),
            ArgsError::MissingGroup => write!(f, "--group is required for toggle"),
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show,
    Toggle,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "show" => Some(Self::Show),
            "toggle" => Some(Self::Toggle),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    user: String,
    group: Option<String>,
    select: Vec<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- show   [--db <sqlite_url>] --user <id>");
    eprintln!(
        "  cargo run -p app -- toggle [--db <sqlite_url>] --user <id> --group <name> \
         [--select <task_id,task_id,...>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:onboarding.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ONBOARD_DB_URL, ONBOARD_USER");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("ONBOARD_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://onboarding.sqlite3".into(), normalize_sqlite_url);
        let mut user = std::env::var("ONBOARD_USER").unwrap_or_default();
        let mut group = None;
        let mut select = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => user = require_value(args, "--user")?,
                "--group" => group = Some(require_value(args, "--group")?),
                "--select" => {
                    let value = require_value(args, "--select")?;
                    select = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_owned)
                        .collect();
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if user.trim().is_empty() {
            return Err(ArgsError::MissingUser);
        }

        Ok(Self {
            db_url,
            user,
            group,
            select,
        })
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

fn label_for(catalog: &Catalog, id: &str) -> String {
    catalog
        .tasks()
        .iter()
        .find(|t| t.id().as_str() == id)
        .map_or_else(|| id.to_owned(), |t| t.label().to_owned())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Show,
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
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let catalog = Arc::new(default_catalog());
    let service = ChecklistService::new(
        Clock::default_clock(),
        Arc::clone(&catalog),
        default_resources(),
        storage.progress,
    );

    let event = match cmd {
        Command::Show => ChecklistEvent::home_opened(Some(&parsed.user))?,
        Command::Toggle => {
            let group = parsed.group.ok_or(ArgsError::MissingGroup)?;
            let action_id = format!("{TOGGLE_ACTION_PREFIX}{}", group.to_lowercase());
            let selected: Vec<SelectedOption> = parsed
                .select
                .iter()
                .map(|id| SelectedOption {
                    label: label_for(&catalog, id),
                    value: id.clone(),
                })
                .collect();
            ChecklistEvent::group_toggle(
                &catalog,
                Some(&parsed.user),
                Some(&action_id),
                Some(&selected),
            )?
        }
    };

    let render = service.handle(&event).await?;
    println!("{}", serde_json::to_string_pretty(&render.view)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
