mod app;
mod async_ops;
mod config;
mod theme;
mod ui;
mod views;

use anyhow::Result;
use app::App;
use async_ops::AsyncCommand;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use app::ServerStatus;
use eventdeck_api_client::{ApiClient, LiveFeedProvider, WsLiveFeedProvider};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;

fn main() -> Result<()> {
    init_logging();

    let config = config::load_config();
    let mut app = App::new(config);

    // Fetch the event list on the first loop tick.
    app.loading_events = true;
    app.pending_command = Some(AsyncCommand::FetchEvents);

    // Terminal setup
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Log to a file under the config directory. The terminal is taken over by
/// the UI, so stdout/stderr are not usable sinks.
fn init_logging() {
    let Ok(dir) = config::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("eventdeck.log"))
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdeck=info".into()),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}

async fn check_health(server_url: &str) -> ServerStatus {
    let client = match ApiClient::new(server_url, Duration::from_secs(1)) {
        Ok(c) => c,
        Err(_) => return ServerStatus::Offline,
    };
    match client.health().await {
        Ok(resp) => ServerStatus::Online(resp.version),
        Err(_) => ServerStatus::Offline,
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    // Realtime attendee feed, connected once at startup. A dead connection
    // degrades to refresh-on-demand; the header shows the channel state.
    let provider = WsLiveFeedProvider::new(rt.handle().clone());
    app.live_subscription = provider.subscribe(&app.config.server.url);

    loop {
        // ── Drain realtime attendee updates ──────────────────────────
        app.poll_live();

        // ── Handle pending async command ─────────────────────────────
        if let Some(cmd) = app.pending_command.take() {
            let result = rt.block_on(async_ops::execute(cmd, &app.config));
            app.apply_command_result(result);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        // ── Deferred health check (runs once, after first render) ────
        if !app.health_check_done {
            app.health_check_done = true;
            app.server_status = rt.block_on(check_health(&app.config.server.url));
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key.code) {
                    break;
                }
            }
        }
    }
    Ok(())
}
