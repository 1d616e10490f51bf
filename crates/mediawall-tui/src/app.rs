use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::warn;

use mediawall_core::config::AppConfig;
use mediawall_core::layout::{layout, Layout};
use mediawall_core::media::{FilterUpdate, SortBy};
use mediawall_core::session::{ActiveFeed, FeedSession, FetchOutcome, FetchTicket};
use mediawall_core::storage::LibraryStore;
use mediawall_core::source::MediaSource;
use mediawall_core::viewport::ViewportTracker;
use mediawall_core::AutoscrollDriver;

use crate::event::FetchMessage;
use crate::input::Action;

/// Rough pixel height of one terminal row, used to translate the
/// pixel-per-millisecond autoscroll step into rows
const PX_PER_ROW: f64 = 16.0;

const MIN_COLUMNS: u32 = 1;
const MAX_COLUMNS: u32 = 12;

/// Convert a configured pixel distance to terminal rows, keeping at least
/// one row so a small gap or padding never collapses to nothing
fn cell_units(pixels: f64) -> f64 {
    (pixels / PX_PER_ROW).round().max(1.0)
}

/// Application state binding the engine to the terminal
pub struct App {
    pub session: FeedSession,
    pub driver: AutoscrollDriver,
    store: Arc<LibraryStore>,
    fetch_tx: mpsc::UnboundedSender<FetchMessage>,
    tracker: ViewportTracker,
    grid: Layout,
    grid_dirty: bool,
    /// Tile gap in rows, from the configured pixel gap
    gap: f64,
    /// Outer grid padding in rows
    padding: f64,
    /// Scroll offset in rows
    pub scroll_top: f64,
    pub columns: u32,
    /// Index into the loaded item sequence
    pub selected: Option<usize>,
    grid_width: u16,
    grid_height: u16,
    pub should_quit: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        store: Arc<LibraryStore>,
        fetch_tx: mpsc::UnboundedSender<FetchMessage>,
    ) -> Self {
        let session = FeedSession::new(
            config.sync.page_size,
            std::time::Duration::from_millis(config.sync.empty_retry_delay_ms),
        );
        let mut driver = AutoscrollDriver::new(config.scroll.speed);
        if config.scroll.autostart {
            driver.enable();
        }

        Self {
            session,
            driver,
            store,
            fetch_tx,
            // Height is sized properly on the first draw; the configured
            // pixel buffer translates to rows like the scroll step does
            tracker: ViewportTracker::new(
                0.0,
                config.grid.viewport_buffer / PX_PER_ROW,
                std::time::Duration::from_millis(config.grid.viewport_interval_ms),
            ),
            grid: Layout::default(),
            grid_dirty: true,
            gap: cell_units(config.grid.gap),
            padding: cell_units(config.grid.padding),
            scroll_top: 0.0,
            columns: config.grid.columns,
            selected: None,
            grid_width: 0,
            grid_height: 0,
            should_quit: false,
            status: None,
        }
    }

    /// Load folders and saved feeds, then dispatch the initial reset fetch
    pub async fn init(&mut self) -> mediawall_core::Result<()> {
        self.session.load_folders(self.store.as_ref()).await?;
        self.session.load_feeds(self.store.as_ref()).await?;
        self.request_fetch(true);
        Ok(())
    }

    pub fn layout(&self) -> &Layout {
        &self.grid
    }

    pub fn visible(&self) -> &[usize] {
        self.tracker.visible()
    }

    /// The grid drawing area changed
    pub fn resize_grid(&mut self, width: u16, height: u16) {
        if (width, height) == (self.grid_width, self.grid_height) {
            return;
        }
        self.grid_width = width;
        self.grid_height = height;
        self.tracker.set_viewport_height(height as f64);
        self.grid_dirty = true;
        self.tracker.invalidate();
    }

    /// One frame: advance autoscroll, refresh the visible set, fire the
    /// pagination trigger, and drain a due retry
    pub fn on_tick(&mut self, now: Instant) {
        let delta = self.driver.frame(now) / PX_PER_ROW;
        if delta != 0.0 {
            self.scroll_to(self.scroll_top + delta);
        }

        self.ensure_layout();
        self.tracker.set_scroll(self.scroll_top);
        self.tracker.update(&self.grid, now);

        let page = self.session.page();
        if !self.grid.is_empty()
            && page.has_more
            && !page.is_loading
            && self.tracker.near_tail(self.grid.total_height)
        {
            self.request_fetch(false);
        }

        if let Some(ticket) = self.session.take_due_retry(now) {
            self.dispatch(ticket);
        }
    }

    /// A fetch response arrived from its task
    pub fn on_fetch_message(&mut self, msg: FetchMessage, now: Instant) {
        let outcome = self.session.apply_fetch(&msg.ticket, msg.result, now);
        if let FetchOutcome::Applied { .. } = outcome {
            if msg.ticket.reset {
                self.scroll_top = 0.0;
                self.selected = None;
            }
            self.grid_dirty = true;
            self.tracker.invalidate();
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_to(self.scroll_top + 2.0),
            Action::ScrollUp => self.scroll_to(self.scroll_top - 2.0),
            Action::PageDown => self.scroll_to(self.scroll_top + self.grid_height as f64),
            Action::PageUp => self.scroll_to(self.scroll_top - self.grid_height as f64),
            Action::JumpTop => self.scroll_to(0.0),
            Action::ToggleAutoscroll => {
                self.driver.toggle();
                self.driver.reset_clock();
            }
            Action::TogglePause => {
                if self.driver.is_paused() {
                    self.driver.resume();
                } else {
                    self.driver.pause();
                }
            }
            Action::SpeedUp => {
                let speed = (self.driver.speed() + 0.25).min(10.0);
                self.driver.set_speed(speed);
            }
            Action::SpeedDown => {
                let speed = (self.driver.speed() - 0.25).max(0.25);
                self.driver.set_speed(speed);
            }
            Action::Select => self.select_under_view(),
            Action::ClearSelection => self.selected = None,
            Action::SelectionDown => self.move_selection(1),
            Action::SelectionUp => self.move_selection(-1),
            Action::ToggleStar => self.star_selected(),
            Action::NextFeed => self.cycle_feed(1),
            Action::PrevFeed => self.cycle_feed(-1),
            Action::MoreColumns => self.set_columns(self.columns + 1),
            Action::FewerColumns => self.set_columns(self.columns.saturating_sub(1)),
            Action::CycleSort => self.cycle_sort(),
            Action::Refresh => self.request_fetch(true),
            Action::None => {}
        }
    }

    /// Start a fetch if the session agrees one is due
    pub fn request_fetch(&mut self, reset: bool) {
        if let Some(ticket) = self.session.begin_fetch(reset) {
            self.dispatch(ticket);
        }
    }

    /// Run the data source call on a task so a slow fetch never blocks
    /// scrolling or input
    fn dispatch(&self, ticket: FetchTicket) {
        let store = Arc::clone(&self.store);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = store
                .fetch_items(ticket.limit, ticket.offset, &ticket.filters)
                .await;
            if tx.send(FetchMessage { ticket, result }).is_err() {
                warn!("fetch result dropped: receiver gone");
            }
        });
    }

    fn scroll_to(&mut self, target: f64) {
        let max_scroll = (self.grid.total_height - self.grid_height as f64).max(0.0);
        self.scroll_top = target.clamp(0.0, max_scroll);
        self.tracker.set_scroll(self.scroll_top);
    }

    /// Recompute the masonry layout if anything it depends on changed
    fn ensure_layout(&mut self) {
        if !self.grid_dirty {
            return;
        }
        self.grid = layout(
            self.session.items(),
            self.columns,
            self.grid_width as f64,
            self.gap,
            self.padding,
        );
        self.grid_dirty = false;
        // content may have shrunk under the viewport
        self.scroll_to(self.scroll_top);
    }

    fn set_columns(&mut self, columns: u32) {
        let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        if columns != self.columns {
            self.columns = columns;
            self.grid_dirty = true;
            self.tracker.invalidate();
        }
    }

    /// Selecting an item to view it permanently disables autoscroll for
    /// this interaction; only an explicit toggle re-enables it
    fn select_under_view(&mut self) {
        self.driver.stop();
        if self.selected.is_none() {
            self.selected = self.first_visible();
        }
        if let Some(idx) = self.selected {
            if let Some(item) = self.session.items().get(idx) {
                self.status = Some(format!("viewing {}", item.file_name()));
            }
        }
    }

    fn first_visible(&self) -> Option<usize> {
        self.tracker
            .visible()
            .iter()
            .copied()
            .find(|&i| {
                self.grid
                    .positions
                    .get(i)
                    .is_some_and(|p| p.top + p.height > self.scroll_top)
            })
            .or_else(|| self.tracker.visible().first().copied())
    }

    fn move_selection(&mut self, delta: i64) {
        let len = self.session.items().len();
        if len == 0 {
            return;
        }
        let next = match self.selected {
            Some(idx) => (idx as i64 + delta).clamp(0, len as i64 - 1) as usize,
            None => self.first_visible().unwrap_or(0),
        };
        self.selected = Some(next);

        // keep the selection on screen
        if let Some(pos) = self.grid.positions.get(next) {
            let bottom = pos.top + pos.height;
            if pos.top < self.scroll_top {
                self.scroll_to(pos.top - 1.0);
            } else if bottom > self.scroll_top + self.grid_height as f64 {
                self.scroll_to(bottom - self.grid_height as f64 + 1.0);
            }
        }
    }

    /// Optimistic star flip plus a fire-and-forget store write
    fn star_selected(&mut self) {
        let Some(idx) = self.selected else {
            self.status = Some("nothing selected".into());
            return;
        };
        let Some(item) = self.session.items().get(idx) else {
            return;
        };
        let id = item.id;

        if let Some(starred) = self.session.toggle_star(id) {
            self.status = Some(if starred {
                "starred".into()
            } else {
                "unstarred".into()
            });
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                // Not rolled back on failure; the copies may diverge until
                // the next reload.
                if let Err(e) = store.toggle_star(id).await {
                    warn!(error = %e, id, "star toggle not persisted");
                }
            });
        }
    }

    /// Ordered view list: home, favorites, then saved feeds
    fn feed_ring(&self) -> Vec<ActiveFeed> {
        let mut ring = vec![ActiveFeed::Home, ActiveFeed::Favorites];
        ring.extend(
            self.session
                .feeds()
                .iter()
                .filter_map(|f| f.id.map(ActiveFeed::Custom)),
        );
        ring
    }

    fn cycle_feed(&mut self, dir: i64) {
        let ring = self.feed_ring();
        let current = ring
            .iter()
            .position(|&f| f == self.session.active())
            .unwrap_or(0);
        let next = (current as i64 + dir).rem_euclid(ring.len() as i64) as usize;

        self.session.select_feed(ring[next]);
        self.scroll_top = 0.0;
        self.selected = None;
        self.grid_dirty = true;
        self.tracker.invalidate();
        self.request_fetch(true);
    }

    /// Step the sort column; persists to the active custom feed like any
    /// other filter edit
    fn cycle_sort(&mut self) {
        let next = match self.session.filters().sort_by {
            SortBy::CreatedAt => SortBy::Filename,
            SortBy::Filename => SortBy::SizeBytes,
            SortBy::SizeBytes => SortBy::Resolution,
            SortBy::Resolution => SortBy::DurationSec,
            SortBy::DurationSec => SortBy::Random,
            SortBy::Random => SortBy::CreatedAt,
        };

        let persist = self.session.set_filters(FilterUpdate {
            sort_by: Some(next),
            ..Default::default()
        });
        if let Some(feed) = persist {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                if let Err(e) = store.save_feed(&feed).await {
                    warn!(error = %e, feed = %feed.name, "failed to persist feed filters");
                }
            });
        }

        self.status = Some(format!("sort: {next:?}"));
        self.scroll_top = 0.0;
        self.selected = None;
        self.grid_dirty = true;
        self.tracker.invalidate();
        self.request_fetch(true);
    }

    /// Display name of the active view
    pub fn active_feed_name(&self) -> String {
        match self.session.active() {
            ActiveFeed::Home => "home".to_string(),
            ActiveFeed::Favorites => "favorites".to_string(),
            ActiveFeed::Custom(id) => self
                .session
                .feed(id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| format!("feed #{id}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_units_from_configured_pixels() {
        // the default 6px gap still separates tiles by a row
        assert_eq!(cell_units(6.0), 1.0);
        // the default 30px padding lands on two rows
        assert_eq!(cell_units(30.0), 2.0);
        assert_eq!(cell_units(0.0), 1.0);
    }
}
