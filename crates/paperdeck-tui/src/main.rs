use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use paperdeck_core::config_file;
use paperdeck_core::{Config, DateRange, HttpPaperSource, PaperSource};

mod action;
mod app;
mod backend;
mod input;
mod logging;
mod theme;
mod tui_event;
mod view;

use app::App;

const DEFAULT_FPS: u32 = 30;

/// paperdeck TUI: browse and search recent papers from a paper-list backend.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Initial search query
    query: Option<String>,

    /// Backend root URL (e.g. http://localhost:8000)
    #[arg(long)]
    api_url: Option<String>,

    /// Date range: today, this-week, this-month, this-year, forever
    #[arg(long)]
    date_range: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Keep the guard alive until exit so buffered log lines are flushed
    let _log_guard = logging::init();

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_config = config_file::load_config();
    let mut config = Config::default();
    config_file::apply_to_config(&file_config, &mut config)?;
    config_file::apply_env(&mut config)?;
    if let Some(url) = args.api_url {
        config.base_url = url;
    }
    if let Some(tag) = &args.date_range {
        config.default_date_range = tag.parse::<DateRange>()?;
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs.max(1);
    }

    let display = file_config.display.clone().unwrap_or_default();
    let theme_name = args
        .theme
        .or(display.theme)
        .unwrap_or_else(|| "hacker".to_string());
    let fps = display.fps.unwrap_or(DEFAULT_FPS).clamp(1, 120);

    let source: Arc<dyn PaperSource> = Arc::new(HttpPaperSource::from_config(&config)?);
    tracing::info!(base_url = %config.base_url, range = %config.default_date_range, "starting paperdeck-tui");

    let mut app = App::new(config, theme::Theme::by_name(&theme_name), theme_name);
    app.file_config = file_config;
    if let Some(query) = args.query.filter(|q| !q.is_empty()) {
        app.controller.on_input(query, std::time::Instant::now());
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    // Backend command/event channels
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    app.backend_cmd_tx = Some(cmd_tx);
    tokio::spawn(backend::run(source, cmd_rx, event_tx));

    // Page load: one fresh search with whatever query was given
    app.start();

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(1000 / fps as u64);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt, &app.input_mode));
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    tracing::info!("paperdeck-tui exited");

    Ok(())
}
