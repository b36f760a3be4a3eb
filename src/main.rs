mod api;
mod app;
mod config;
mod dispatch;
mod fetch;
mod input;
mod models;
mod ui;
mod views;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use app::{App, Settings};
use config::{Config, Overrides, Source};
use dispatch::{ApiEvent, Dispatcher};
use views::FormMode;

/// Terminal client for a video game collection server
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Server origin, e.g. http://localhost:5000
    #[arg(short, long)]
    base_url: Option<String>,

    /// Game whose reviews the reviews panel opens with
    #[arg(short, long)]
    game_id: Option<String>,

    /// How the add game form is shown
    #[arg(long, value_enum)]
    form_mode: Option<FormMode>,

    /// Hide cover URLs and descriptions on game cards
    #[arg(long)]
    compact: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append logs to this file instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, source) = Config::load(cli.config.as_deref())?;
    let config = config.apply(Overrides {
        base_url: cli.base_url,
        review_game_id: cli.game_id,
        form_mode: cli.form_mode,
        compact: cli.compact,
        log_file: cli.log_file,
    });

    let log_path = config.log_path();
    init_logging(&log_path)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        "starting game tracker"
    );
    match &source {
        Source::File(path) => info!(path = %path.display(), "loaded config file"),
        Source::Defaults => info!("no config file, using defaults"),
    }

    let client = ApiClient::new(&config.base_url)?;
    info!(api = %client.base_url(), "api client ready");
    let (mut dispatcher, mut api_rx) = Dispatcher::new(client);
    let (mut app, commands) = App::new(Settings::from(&config));
    dispatcher.run(commands);

    // Init terminal
    let mut terminal = ratatui::init();

    let result = run_app(&mut terminal, &mut app, &mut dispatcher, &mut api_rx).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        error!(error = %e, "exiting on error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    info!("bye");
    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    dispatcher: &mut Dispatcher,
    api_rx: &mut UnboundedReceiver<ApiEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = EventStream::new();
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            debug!(in_flight = dispatcher.in_flight(), "quitting");
            return Ok(());
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let commands = input::handle_key(app, key);
                    dispatcher.run(commands);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(event) = api_rx.recv() => app.handle_api_event(event),
        }
    }
}
