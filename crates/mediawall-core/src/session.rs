//! Feed state machine
//!
//! Owns the loaded item sequence, the active feed selection, the filter
//! snapshot, and the pagination cursor. Fetches are asynchronous, so the
//! session hands out [`FetchTicket`]s tagged with a generation counter;
//! responses are only applied while their generation is still current, which
//! is what keeps a slow fetch from leaking into a feed that was switched or
//! refiltered while it was in flight.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::media::{Feed, FilterOptions, FilterUpdate, Folder, MediaItem};
use crate::source::MediaSource;
use crate::Result;

/// Which view the session is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFeed {
    /// Union of all active folders with default filters
    Home,
    /// Built-in filter over starred items
    Favorites,
    /// A saved feed with its persisted folder set and filter snapshot
    Custom(i64),
}

/// Pagination cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// Count of items already loaded; the next page starts here
    pub offset: u32,
    pub page_size: u32,
    pub has_more: bool,
    pub is_loading: bool,
}

impl PageState {
    fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size,
            has_more: true,
            is_loading: false,
        }
    }
}

/// A dispatched fetch, pinned to the generation it was issued under.
///
/// The ticket carries everything the data source call needs so the actual
/// request can run on a spawned task while the session keeps processing
/// events; `apply_fetch` checks the generation on the way back in.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub offset: u32,
    pub limit: u32,
    pub filters: FilterOptions,
    pub reset: bool,
    /// Set for the single scheduled empty-result retry so its own empty
    /// result does not schedule another
    pub is_retry: bool,
}

/// What `apply_fetch` did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Items were appended or replaced
    Applied { count: usize },
    /// The response belonged to a superseded generation and was dropped
    Stale,
    /// The fetch failed; state is unchanged apart from the in-flight flag
    Failed,
}

#[derive(Debug, Clone)]
struct PendingRetry {
    generation: u64,
    deadline: Instant,
}

#[derive(Debug)]
pub struct FeedSession {
    items: Vec<MediaItem>,
    filters: FilterOptions,
    folders: Vec<Folder>,
    feeds: Vec<Feed>,
    active: ActiveFeed,
    page: PageState,
    generation: u64,
    retry: Option<PendingRetry>,
    retry_delay: Duration,
}

impl FeedSession {
    pub fn new(page_size: u32, retry_delay: Duration) -> Self {
        Self {
            items: Vec::new(),
            filters: FilterOptions::default(),
            folders: Vec::new(),
            feeds: Vec::new(),
            active: ActiveFeed::Home,
            page: PageState::new(page_size),
            generation: 0,
            retry: None,
            retry_delay,
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    pub fn active(&self) -> ActiveFeed {
        self.active
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    pub fn feed(&self, id: i64) -> Option<&Feed> {
        self.feeds.iter().find(|f| f.id == Some(id))
    }

    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.folders = folders;
    }

    pub fn set_feeds(&mut self, feeds: Vec<Feed>) {
        self.feeds = feeds;
    }

    /// Switch the active view. The item sequence and pagination cursor are
    /// invalidated atomically, before any new fetch is dispatched.
    pub fn select_feed(&mut self, target: ActiveFeed) {
        match target {
            ActiveFeed::Home | ActiveFeed::Favorites => {
                self.filters = FilterOptions::default();
            }
            ActiveFeed::Custom(id) => match self.feed(id) {
                Some(feed) => self.filters = feed.filters.clone(),
                None => {
                    warn!(feed_id = id, "selecting unknown feed, keeping home scope");
                    self.active = ActiveFeed::Home;
                    self.filters = FilterOptions::default();
                    self.invalidate();
                    return;
                }
            },
        }

        self.active = target;
        self.invalidate();
    }

    /// Merge a partial filter change into the current snapshot.
    ///
    /// Clears items and resets pagination. When a custom feed is active the
    /// merged snapshot is written back to its stored configuration and the
    /// updated record is returned so the caller persists it.
    pub fn set_filters(&mut self, update: FilterUpdate) -> Option<Feed> {
        self.filters.merge(update);
        self.invalidate();

        if let ActiveFeed::Custom(id) = self.active {
            if let Some(feed) = self.feeds.iter_mut().find(|f| f.id == Some(id)) {
                feed.filters = self.filters.clone();
                return Some(feed.clone());
            }
        }
        None
    }

    /// Start a fetch, if one is due.
    ///
    /// Returns `None` when a fetch is already in flight (unless `reset`,
    /// which always proceeds and supersedes it) or when the feed is
    /// exhausted. A reset clears the loaded sequence first so the staleness
    /// guard covers anything still in flight.
    pub fn begin_fetch(&mut self, reset: bool) -> Option<FetchTicket> {
        if !reset && (self.page.is_loading || !self.page.has_more) {
            return None;
        }

        if reset {
            self.invalidate();
        }

        self.page.is_loading = true;
        Some(FetchTicket {
            generation: self.generation,
            offset: self.page.offset,
            limit: self.page.page_size,
            filters: self.scoped_filters(),
            reset,
            is_retry: false,
        })
    }

    /// Apply a fetch response. Responses from a superseded generation are
    /// dropped without touching any state.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<MediaItem>>,
        now: Instant,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "dropping stale fetch response"
            );
            return FetchOutcome::Stale;
        }

        let new_items = match result {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "fetch failed, feed left unchanged");
                self.page.is_loading = false;
                return FetchOutcome::Failed;
            }
        };

        let count = new_items.len();
        self.page.is_loading = false;
        self.page.has_more = count as u32 == ticket.limit;

        if ticket.reset {
            self.items = new_items;
        } else {
            self.items.extend(new_items);
        }
        self.page.offset = self.items.len() as u32;

        // A reset that comes back empty while folders are configured can be
        // a backend indexing race; retry once after a delay, then give up.
        let scoped = ticket
            .filters
            .folder_paths
            .as_ref()
            .is_some_and(|p| !p.is_empty());
        if ticket.reset && count == 0 && scoped && !ticket.is_retry {
            debug!(delay_ms = self.retry_delay.as_millis() as u64, "scheduling empty-result retry");
            self.retry = Some(PendingRetry {
                generation: self.generation,
                deadline: now + self.retry_delay,
            });
        }

        FetchOutcome::Applied { count }
    }

    /// Hand out the scheduled retry once its deadline passes.
    ///
    /// The retry is pinned to the generation it was scheduled under; any
    /// reset in between cancels it. It also gives up if items arrived some
    /// other way in the meantime.
    pub fn take_due_retry(&mut self, now: Instant) -> Option<FetchTicket> {
        let pending = self.retry.as_ref()?;
        if pending.generation != self.generation {
            self.retry = None;
            return None;
        }
        if now < pending.deadline {
            return None;
        }
        self.retry = None;

        if !self.items.is_empty() {
            return None;
        }

        self.page.is_loading = true;
        Some(FetchTicket {
            generation: self.generation,
            offset: 0,
            limit: self.page.page_size,
            filters: self.scoped_filters(),
            reset: true,
            is_retry: true,
        })
    }

    /// Optimistic local star flip. Never rolled back; the store call is
    /// fire-and-forget and the copies may diverge until the next reload.
    pub fn toggle_star(&mut self, id: i64) -> Option<bool> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        item.starred = !item.starred;
        Some(item.starred)
    }

    /// Record dimensions discovered at render time. Returns true when the
    /// item existed and had no dimensions yet, i.e. the caller should also
    /// report them to the store.
    pub fn set_dimensions(&mut self, id: i64, width: u32, height: u32) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                let first = item.width.is_none() || item.height.is_none();
                item.width = Some(width);
                item.height = Some(height);
                first
            }
            None => false,
        }
    }

    /// Clear loaded state and bump the generation so anything still in
    /// flight is rejected on arrival.
    fn invalidate(&mut self) {
        self.items.clear();
        self.page.offset = 0;
        self.page.has_more = true;
        self.page.is_loading = false;
        self.generation += 1;
        self.retry = None;
    }

    /// Current filters with the folder scope resolved for the active view
    fn scoped_filters(&self) -> FilterOptions {
        let mut filters = self.filters.clone();

        match self.active {
            ActiveFeed::Home => {
                filters.folder_paths = Some(self.active_folder_paths());
            }
            ActiveFeed::Favorites => {
                filters.folder_paths = Some(self.active_folder_paths());
                filters.favorites_only = Some(true);
            }
            ActiveFeed::Custom(id) => {
                filters.folder_paths = self
                    .feed(id)
                    .map(|feed| feed.folder_paths.clone())
                    .or_else(|| Some(self.active_folder_paths()));
            }
        }

        filters
    }

    fn active_folder_paths(&self) -> Vec<String> {
        self.folders
            .iter()
            .filter(|f| f.is_active)
            .map(|f| f.path.clone())
            .collect()
    }

    // Async orchestration on top of the ticket protocol. These run the
    // request inline; callers that must not block (the TUI event loop)
    // spawn the source call themselves and feed the ticket back through
    // `apply_fetch`.

    /// Fetch a page and apply it
    pub async fn fetch_page(&mut self, source: &dyn MediaSource, reset: bool) -> FetchOutcome {
        let Some(ticket) = self.begin_fetch(reset) else {
            return FetchOutcome::Applied { count: 0 };
        };
        let result = source
            .fetch_items(ticket.limit, ticket.offset, &ticket.filters)
            .await;
        self.apply_fetch(&ticket, result, Instant::now())
    }

    /// Reload the folder list from the store
    pub async fn load_folders(&mut self, source: &dyn MediaSource) -> Result<()> {
        self.folders = source.list_folders().await?;
        Ok(())
    }

    /// Reload the saved feed list from the store
    pub async fn load_feeds(&mut self, source: &dyn MediaSource) -> Result<()> {
        self.feeds = source.list_feeds().await?;
        Ok(())
    }

    /// Merge a filter change, persist it to the active custom feed if any,
    /// and dispatch the reset fetch
    pub async fn apply_filter_update(
        &mut self,
        source: &dyn MediaSource,
        update: FilterUpdate,
    ) -> FetchOutcome {
        if let Some(feed) = self.set_filters(update) {
            if let Err(e) = source.save_feed(&feed).await {
                warn!(error = %e, feed = %feed.name, "failed to persist feed filters");
            }
        }
        self.fetch_page(source, true).await
    }

    /// Optimistic star flip plus the fire-and-forget store call
    pub async fn star(&mut self, source: &dyn MediaSource, id: i64) {
        if self.toggle_star(id).is_none() {
            return;
        }
        if let Err(e) = source.toggle_star(id).await {
            // Deliberately not rolled back; see the error-handling notes.
            warn!(error = %e, id, "star toggle not persisted");
        }
    }

    /// Record freshly observed dimensions locally and write them through
    pub async fn report_dimensions(
        &mut self,
        source: &dyn MediaSource,
        id: i64,
        width: u32,
        height: u32,
    ) {
        if !self.set_dimensions(id, width, height) {
            return;
        }
        if let Err(e) = source.report_dimensions(id, width, height).await {
            warn!(error = %e, id, "dimension report not persisted");
        }
    }
}
