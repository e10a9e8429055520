//! studygate - study-time tracking behind a login gate
//!
//! This is the main entry point for the studygate CLI.
//! It wires together all the components:
//! - Configuration loading
//! - Store initialization
//! - Session gate and time tracker
//! - Terminal page host
//! - The interactive page loop (`watch`)

mod host;
mod render;
mod watch;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use studygate_api::{PageSignal, TrackerState};
use studygate_config::{Settings, load_config};
use studygate_core::{PageSession, SessionGate, StaticCredentials, TimeTracker, login_url};
use studygate_host_api::{PageHost, PageLocation};
use studygate_store::{SqliteStore, Store};
use studygate_util::{
    Clock, SystemClock, default_config_path, format_study_time, is_mock_time_active, store_path,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::host::TerminalHost;

/// studygate - Study-time tracking behind a login gate
#[derive(Parser, Debug)]
#[command(name = "studygate")]
#[command(about = "Study-time tracking behind a login gate", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/studygate/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set STUDYGATE_DATA_DIR env var)
    #[arg(short, long, env = "STUDYGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Page the command runs on, as `path?query`
    #[arg(short, long, default_value = "/index.html")]
    page: String,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Log in; follows a `redirect` parameter in --page
    Login {
        username: String,
        #[arg(long, env = "STUDYGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Stop tracking and log out
    Logout,
    /// Show session and tracker state
    Status,
    /// Load the page: gate, then start tracking
    Open,
    /// Start a study interval
    Start,
    /// Stop the study interval and record it
    Stop,
    /// Pause the study interval
    Pause,
    /// Resume a paused study interval
    Resume,
    /// Deliver a page signal
    Signal { signal: PageSignal },
    /// The page is closing; stop the interval
    Unload,
    /// Seven-day progress report
    Report {
        #[arg(long)]
        json: bool,
    },
    /// Overall statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Show the daily goal, set it in minutes, or reset it with --reset
    Goal {
        minutes: Option<u32>,
        #[arg(long, conflicts_with = "minutes")]
        reset: bool,
    },
    /// Keep the page open: live display, activity commands on stdin
    Watch,
}

/// Everything a command needs
struct App {
    settings: Settings,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    host: Arc<TerminalHost>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let settings = if args.config.exists() {
            let settings = load_config(&args.config)
                .with_context(|| format!("Failed to load config from {:?}", args.config))?;
            info!(
                config_path = %args.config.display(),
                users = settings.users.len(),
                "Configuration loaded"
            );
            settings
        } else {
            warn!(
                config_path = %args.config.display(),
                "Config file not found, using defaults (no users can log in)"
            );
            Settings::default()
        };

        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| settings.storage.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = store_path(&data_dir);
        let store: Arc<dyn Store> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        Ok(Self {
            settings,
            store,
            clock: Arc::new(SystemClock),
            host: Arc::new(TerminalHost::new(PageLocation::parse(&args.page))),
        })
    }

    fn gate(&self) -> SessionGate {
        SessionGate::new(
            self.store.clone(),
            self.clock.clone(),
            Arc::new(StaticCredentials::from_settings(&self.settings)),
            &self.settings.session,
        )
    }

    fn tracker(&self) -> TimeTracker {
        TimeTracker::new(
            self.store.clone(),
            self.clock.clone(),
            self.settings.tracker.clone(),
        )
    }

    fn page(&self) -> Result<PageSession> {
        let host: Arc<dyn PageHost> = self.host.clone();
        Ok(PageSession::new(self.gate(), self.tracker(), host)?)
    }

    /// Protected pages send logged-out users to the login page
    fn require_login(&self) -> Result<()> {
        if self.gate().is_valid()? {
            return Ok(());
        }
        let url = login_url(&self.settings.session.login_path, &self.host.location());
        self.host.navigate(&url)?;
        bail!("Not logged in, log in at {}", url);
    }
}

async fn run(app: &App, command: Cmd) -> Result<()> {
    match command {
        Cmd::Login { username, password } => {
            let events = app.page()?.login(&username, &password)?;
            render::print_events(&events);
            if !app.gate().is_valid()? {
                bail!("Login failed");
            }
            println!("{}", app.gate().format_remaining()?);
        }

        Cmd::Logout => {
            render::print_events(&app.page()?.logout()?);
        }

        Cmd::Status => {
            let gate = app.gate();
            match gate.current_user()? {
                Some(user) => println!("Logged in as {} ({})", user, gate.format_remaining()?),
                None => println!("Not logged in"),
            }
            println!("{}", render::status_line(&app.tracker().status()?));
            if is_mock_time_active() {
                println!("(mock time active)");
            }
        }

        Cmd::Open => {
            render::print_events(&app.page()?.load()?);
        }

        Cmd::Start => {
            app.require_login()?;
            let mut page = app.page()?;
            if page.tracker().state()? != TrackerState::Idle {
                println!("Study session already in progress");
                return Ok(());
            }
            if let Some(event) = page.toggle()? {
                render::print_events(&[event]);
            }
        }

        Cmd::Stop | Cmd::Unload => match app.page()?.unload()? {
            Some(event) => render::print_events(&[event]),
            None => println!("No study session in progress"),
        },

        Cmd::Pause => {
            app.require_login()?;
            if app.tracker().pause()? {
                println!("Study session paused");
            } else {
                println!("Nothing to pause");
            }
        }

        Cmd::Resume => {
            app.require_login()?;
            match app.tracker().resume()? {
                Some(paused_for) => println!(
                    "Study session resumed after {}",
                    studygate_util::format_clock(paused_for)
                ),
                None => println!("Nothing to resume"),
            }
        }

        Cmd::Signal { signal } => {
            app.require_login()?;
            match app.page()?.signal(signal)? {
                Some(event) => render::print_events(&[event]),
                None => println!("No change"),
            }
        }

        Cmd::Report { json } => {
            app.require_login()?;
            let report = app.tracker().weekly_report(app.gate().current_user()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render::print_report(&report);
            }
        }

        Cmd::Stats { json } => {
            app.require_login()?;
            let stats = app.tracker().statistics()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                render::print_statistics(&stats);
            }
        }

        Cmd::Goal { minutes, reset } => {
            let tracker = app.tracker();
            if reset {
                tracker.set_daily_goal(None)?;
            } else if let Some(minutes) = minutes {
                if minutes == 0 {
                    bail!("Daily goal must be at least one minute");
                }
                tracker.set_daily_goal(Some(minutes))?;
            }
            println!("Daily goal: {}", format_study_time(tracker.daily_goal()?));
        }

        Cmd::Watch => {
            watch::run(
                app.page()?,
                app.settings.tracker.refresh_interval,
                app.settings.session.expiry_check_interval,
            )
            .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "studygate starting");

    let app = App::new(&args)?;
    run(&app, args.command).await
}
