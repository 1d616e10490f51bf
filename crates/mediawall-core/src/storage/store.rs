use async_trait::async_trait;

use super::{Database, FeedRepository, FolderRepository, MediaRepository};
use crate::media::{Feed, FilterOptions, Folder, MediaItem};
use crate::source::MediaSource;
use crate::Result;

/// The bundled SQLite-backed data source.
///
/// Thin facade over the repositories so the engine can be handed a single
/// [`MediaSource`] object.
#[derive(Clone)]
pub struct LibraryStore {
    db: Database,
}

impl LibraryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn media(&self) -> MediaRepository<'_> {
        MediaRepository::new(&self.db)
    }

    pub fn folders(&self) -> FolderRepository<'_> {
        FolderRepository::new(&self.db)
    }

    pub fn feeds(&self) -> FeedRepository<'_> {
        FeedRepository::new(&self.db)
    }
}

#[async_trait]
impl MediaSource for LibraryStore {
    async fn fetch_items(
        &self,
        limit: u32,
        offset: u32,
        filters: &FilterOptions,
    ) -> Result<Vec<MediaItem>> {
        self.media().fetch(limit, offset, filters).await
    }

    async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.folders().list_all().await
    }

    async fn add_folder(&self, path: &str) -> Result<()> {
        self.folders().add(path).await
    }

    async fn remove_folder(&self, path: &str) -> Result<()> {
        self.folders().remove(path).await
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>> {
        self.feeds().list_all().await
    }

    async fn save_feed(&self, feed: &Feed) -> Result<Feed> {
        self.feeds().save(feed).await
    }

    async fn delete_feed(&self, id: i64) -> Result<()> {
        self.feeds().delete(id).await?;
        Ok(())
    }

    async fn toggle_star(&self, id: i64) -> Result<bool> {
        self.media().toggle_star(id).await
    }

    async fn report_dimensions(&self, id: i64, width: u32, height: u32) -> Result<()> {
        self.media().set_dimensions(id, width, height).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaKind, NewMediaItem};
    use crate::session::{ActiveFeed, FeedSession, FetchOutcome};
    use chrono::Utc;
    use std::time::Duration;

    async fn store_with_items(count: usize) -> LibraryStore {
        let db = Database::new_in_memory().await.unwrap();
        let store = LibraryStore::new(db);
        store.folders().add("/pics").await.unwrap();
        for i in 0..count {
            store
                .media()
                .insert(&NewMediaItem {
                    path: format!("/pics/{i:04}.jpg"),
                    kind: MediaKind::Image,
                    size_bytes: 100 + i as i64,
                    created_at: Utc::now(),
                    width: Some(800),
                    height: Some(600),
                    duration_sec: None,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_session_pages_through_the_store() {
        let store = store_with_items(62).await;
        let mut session = FeedSession::new(50, Duration::from_millis(10));
        session.load_folders(&store).await.unwrap();

        let outcome = session.fetch_page(&store, true).await;
        assert_eq!(outcome, FetchOutcome::Applied { count: 50 });
        assert!(session.page().has_more);

        let outcome = session.fetch_page(&store, false).await;
        assert_eq!(outcome, FetchOutcome::Applied { count: 12 });
        assert!(!session.page().has_more);
        assert_eq!(session.items().len(), 62);

        // exhausted feed: the no-op path reports zero applied
        let outcome = session.fetch_page(&store, false).await;
        assert_eq!(outcome, FetchOutcome::Applied { count: 0 });
        assert_eq!(session.items().len(), 62);
    }

    #[tokio::test]
    async fn test_star_round_trips_through_the_store() {
        let store = store_with_items(3).await;
        let mut session = FeedSession::new(50, Duration::from_millis(10));
        session.load_folders(&store).await.unwrap();
        session.fetch_page(&store, true).await;

        let id = session.items()[0].id;
        session.star(&store, id).await;
        assert!(session.items()[0].starred);

        session.select_feed(ActiveFeed::Favorites);
        session.fetch_page(&store, true).await;
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].id, id);
    }

    #[tokio::test]
    async fn test_filter_update_persists_to_active_custom_feed() {
        let store = store_with_items(5).await;
        let saved = store
            .save_feed(&Feed::new(
                "pics",
                vec!["/pics".into()],
                FilterOptions::default(),
            ))
            .await
            .unwrap();

        let mut session = FeedSession::new(50, Duration::from_millis(10));
        session.load_folders(&store).await.unwrap();
        session.load_feeds(&store).await.unwrap();
        session.select_feed(ActiveFeed::Custom(saved.id.unwrap()));

        session
            .apply_filter_update(
                &store,
                crate::media::FilterUpdate {
                    sort_by: Some(crate::media::SortBy::Filename),
                    sort_order: Some(crate::media::SortOrder::Asc),
                    ..Default::default()
                },
            )
            .await;

        // the live edit reached the stored configuration
        let reloaded = store.feeds().find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(reloaded.filters.sort_by, crate::media::SortBy::Filename);

        // and the reset fetch came back in the new order
        assert_eq!(session.items()[0].path, "/pics/0000.jpg");
    }

    #[tokio::test]
    async fn test_report_dimensions_writes_through() {
        let db = Database::new_in_memory().await.unwrap();
        let store = LibraryStore::new(db);
        store.folders().add("/v").await.unwrap();
        let item = store
            .media()
            .insert(&NewMediaItem {
                path: "/v/clip.mp4".into(),
                kind: MediaKind::Video,
                size_bytes: 1,
                created_at: Utc::now(),
                width: None,
                height: None,
                duration_sec: Some(3.0),
            })
            .await
            .unwrap();

        let mut session = FeedSession::new(50, Duration::from_millis(10));
        session.load_folders(&store).await.unwrap();
        session.fetch_page(&store, true).await;

        session.report_dimensions(&store, item.id, 1920, 1080).await;
        assert_eq!(session.items()[0].width, Some(1920));

        let stored = store
            .fetch_items(1, 0, &FilterOptions::default())
            .await
            .unwrap();
        assert_eq!(stored[0].width, Some(1920));
    }
}
