use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use reflex_core::model::{DifficultyTier, TierError};
use services::{
    Clock, SessionLauncher, SpeechAnnouncer, SpeechSettings, SpeechSettingsError, ThemeService,
};
use storage::repository::Storage;
use ui::{App, UiApp, WebSpeechSink, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://reflex.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTier(TierError),
    InvalidSeed { raw: String },
    InvalidSpeechRate { raw: String },
    InvalidSpeech(SpeechSettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTier(err) => write!(f, "invalid --tier value: {err}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidSpeechRate { raw } => write!(f, "invalid --speech-rate value: {raw}"),
            ArgsError::InvalidSpeech(err) => write!(f, "invalid speech settings: {err}"),
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

struct DesktopApp {
    themes: Arc<ThemeService>,
    sessions: SessionLauncher,
    initial_tier: Option<DifficultyTier>,
}

impl UiApp for DesktopApp {
    fn themes(&self) -> Arc<ThemeService> {
        Arc::clone(&self.themes)
    }

    fn sessions(&self) -> SessionLauncher {
        self.sessions.clone()
    }

    fn initial_tier(&self) -> Option<DifficultyTier> {
        self.initial_tier
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    tier: Option<DifficultyTier>,
    seed: Option<u64>,
    speech: SpeechSettings,
}

#[derive(Debug)]
enum Invocation {
    Run(Args),
    Help,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--tier <tier>] [--seed <u64>]");
    eprintln!("                      [--speech-rate <rate>] [--locale <tag>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --speech-rate 0.8");
    eprintln!("  --locale en-US");
    eprintln!();
    eprintln!("Tiers: beginner, intermediate, advanced");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REFLEX_DB_URL, REFLEX_TIER, REFLEX_SEED, RUST_LOG");
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Invocation, ArgsError> {
        let mut db_url = env("REFLEX_DB_URL").map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut tier = env("REFLEX_TIER").map(|raw| parse_tier(&raw)).transpose()?;
        let mut seed = env("REFLEX_SEED").map(parse_seed).transpose()?;
        let defaults = SpeechSettings::default();
        let mut rate = defaults.rate();
        let mut locale = defaults.locale().to_string();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--tier" => tier = Some(parse_tier(&require_value(args, "--tier")?)?),
                "--seed" => seed = Some(parse_seed(require_value(args, "--seed")?)?),
                "--speech-rate" => {
                    let value = require_value(args, "--speech-rate")?;
                    rate = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSpeechRate { raw: value.clone() })?;
                }
                "--locale" => locale = require_value(args, "--locale")?,
                "--help" | "-h" => return Ok(Invocation::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let speech = SpeechSettings::new(locale, rate, defaults.pitch())
            .map_err(ArgsError::InvalidSpeech)?;
        Ok(Invocation::Run(Self {
            db_url,
            tier,
            seed,
            speech,
        }))
    }
}

fn parse_tier(raw: &str) -> Result<DifficultyTier, ArgsError> {
    raw.parse().map_err(ArgsError::InvalidTier)
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
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

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })? {
        Invocation::Run(args) => args,
        Invocation::Help => {
            print_usage();
            return Ok(());
        }
    };

    init_logging();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    tracing::info!(db = %parsed.db_url, tier = ?parsed.tier, seed = ?parsed.seed, "starting");

    let announcer = SpeechAnnouncer::new(parsed.speech, Arc::new(WebSpeechSink::default()));
    let sessions = SessionLauncher::new(Clock::default_clock(), announcer);
    let sessions = match parsed.seed {
        Some(seed) => sessions.with_seed(seed),
        None => sessions,
    };

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        themes: Arc::new(ThemeService::new(Arc::clone(&storage.preferences))),
        sessions,
        initial_tier: parsed.tier,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Reflex Practice")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
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
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
