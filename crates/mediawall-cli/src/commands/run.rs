use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;

use mediawall_core::{storage::Database, storage::LibraryStore, AppConfig};
use mediawall_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::map_key,
    widgets::{GridWidget, StatusBarWidget},
};

pub async fn execute(config: AppConfig, db: Database) -> Result<()> {
    let store = Arc::new(LibraryStore::new(db));
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel();

    let mut app = App::new(&config, store, fetch_tx);
    app.init().await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(config.scroll.tick_rate_ms);
    let result = run_loop(&mut terminal, &mut app, &events, &mut fetch_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    fetch_rx: &mut mpsc::UnboundedReceiver<mediawall_tui::event::FetchMessage>,
) -> Result<()> {
    loop {
        // Apply any fetch responses that arrived since the last frame; stale
        // ones are rejected by the session's generation check.
        while let Ok(msg) = fetch_rx.try_recv() {
            app.on_fetch_message(msg, Instant::now());
        }

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            app.resize_grid(chunks[0].width, chunks[0].height);
            GridWidget::render(frame, chunks[0], app);
            StatusBarWidget::render(frame, chunks[1], app);
        })?;

        match events.next()? {
            Some(AppEvent::Key(key)) => app.apply_action(map_key(key)),
            Some(AppEvent::Resize(_, _)) => {
                // the next draw picks the new size up from the frame area
            }
            Some(AppEvent::Tick) => app.on_tick(Instant::now()),
            None => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
