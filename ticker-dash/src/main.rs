/// Real-time single ticker dashboard
///
/// Polls the Yahoo Finance chart API for one ticker and draws candlesticks with EMA10 and
/// Bollinger bands, an RSI(14) panel and the latest merged rows.
use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use ticker_dash::{
    DashConfig, RefreshController, app::App, logging::init_logging, render::ChartStore, ui,
};
use ticker_data::{clock::SystemClock, provider::yahoo::YahooFinance};
use tracing::info;

/// Longest the loop blocks on input before checking the tick schedule again.
const MAX_INPUT_WAIT: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashConfig::from_env();
    init_logging(&config.log_path)?;
    info!(?config, "starting ticker-dash");

    let provider = Arc::new(YahooFinance::new(config.yahoo())?);
    let controller = RefreshController::new(
        provider,
        Arc::new(SystemClock),
        config.history_ttl,
        ChartStore::new(),
    );
    let mut app = App::new(controller, config.speed, config.table_rows);
    app.submit_ticker(&config.ticker);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("ticker-dash stopped");

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        // Draw first so the loading state is visible while a tick is awaited
        terminal.draw(|f| ui::draw(f, app))?;

        if app.poll_tick(Instant::now()).await.is_some() {
            terminal.draw(|f| ui::draw(f, app))?;
        }

        let timeout = app.schedule().wait_budget(Instant::now(), MAX_INPUT_WAIT);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
