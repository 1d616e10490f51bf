//! External data source contract
//!
//! The engine never talks to storage directly; everything it needs from the
//! backing index goes through this trait. The bundled SQLite implementation
//! lives in [`crate::storage::LibraryStore`].

use async_trait::async_trait;

use crate::media::{Feed, FilterOptions, Folder, MediaItem};
use crate::Result;

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch one page of the index, ordered by the filter's sort settings.
    ///
    /// Deterministic for fixed `(filters, offset, limit)` against a stable
    /// index, except for random sort which reshuffles every call.
    async fn fetch_items(
        &self,
        limit: u32,
        offset: u32,
        filters: &FilterOptions,
    ) -> Result<Vec<MediaItem>>;

    async fn list_folders(&self) -> Result<Vec<Folder>>;

    async fn add_folder(&self, path: &str) -> Result<()>;

    async fn remove_folder(&self, path: &str) -> Result<()>;

    async fn list_feeds(&self) -> Result<Vec<Feed>>;

    /// Upsert by id; returns the stored feed with its id filled in
    async fn save_feed(&self, feed: &Feed) -> Result<Feed>;

    async fn delete_feed(&self, id: i64) -> Result<()>;

    /// Flip the starred flag, returning the new state
    async fn toggle_star(&self, id: i64) -> Result<bool>;

    /// Write-through dimension correction, sent once per item when the
    /// rendering layer first observes the true size
    async fn report_dimensions(&self, id: i64, width: u32, height: u32) -> Result<()>;
}
