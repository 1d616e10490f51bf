use sqlx::FromRow;

use super::Database;
use crate::media::{Feed, FilterOptions};
use crate::{Error, Result};

/// Repository for saved-feed CRUD.
///
/// Folder sets and filter snapshots are stored as JSON text columns; a
/// snapshot that fails to parse falls back to defaults rather than hiding
/// the feed.
pub struct FeedRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct FeedRow {
    id: i64,
    name: String,
    folder_paths: String,
    filter_config: String,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        let folder_paths = serde_json::from_str(&row.folder_paths).unwrap_or_default();
        let filters =
            serde_json::from_str::<FilterOptions>(&row.filter_config).unwrap_or_default();
        Feed {
            id: Some(row.id),
            name: row.name,
            folder_paths,
            filters,
        }
    }
}

impl<'a> FeedRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<Feed>> {
        let rows: Vec<FeedRow> =
            sqlx::query_as("SELECT id, name, folder_paths, filter_config FROM feeds")
                .fetch_all(self.db.pool())
                .await?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Feed>> {
        let row: Option<FeedRow> =
            sqlx::query_as("SELECT id, name, folder_paths, filter_config FROM feeds WHERE id = ?")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(row.map(Feed::from))
    }

    /// Insert or update by id; returns the stored feed with its id filled in
    pub async fn save(&self, feed: &Feed) -> Result<Feed> {
        let folder_paths = serde_json::to_string(&feed.folder_paths)?;
        let filter_config = serde_json::to_string(&feed.filters)?;

        let id = match feed.id {
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE feeds SET name = ?, folder_paths = ?, filter_config = ? WHERE id = ?",
                )
                .bind(&feed.name)
                .bind(&folder_paths)
                .bind(&filter_config)
                .bind(id)
                .execute(self.db.pool())
                .await?;

                if result.rows_affected() == 0 {
                    return Err(Error::FeedNotFound(id));
                }
                id
            }
            None => {
                let result = sqlx::query(
                    "INSERT INTO feeds (name, folder_paths, filter_config) VALUES (?, ?, ?)",
                )
                .bind(&feed.name)
                .bind(&folder_paths)
                .bind(&filter_config)
                .execute(self.db.pool())
                .await?;

                result.last_insert_rowid()
            }
        };

        self.find_by_id(id).await?.ok_or(Error::FeedNotFound(id))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaKindFilter, SortBy};

    #[tokio::test]
    async fn test_save_and_reload_round_trips_snapshot() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = FeedRepository::new(&db);

        let feed = Feed::new(
            "landscapes",
            vec!["/photos/alps".into(), "/photos/coast".into()],
            FilterOptions {
                media_type: MediaKindFilter::Image,
                sort_by: SortBy::Resolution,
                ..Default::default()
            },
        );

        let stored = repo.save(&feed).await.unwrap();
        let id = stored.id.unwrap();

        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].folder_paths, feed.folder_paths);
        assert_eq!(listed[0].filters, feed.filters);

        // update by id upserts in place
        let mut updated = stored;
        updated.name = "mountains".into();
        repo.save(&updated).await.unwrap();
        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "mountains");
        assert_eq!(listed[0].id, Some(id));
    }

    #[tokio::test]
    async fn test_update_of_missing_feed_errors() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = FeedRepository::new(&db);

        let mut feed = Feed::new("ghost", vec![], FilterOptions::default());
        feed.id = Some(404);
        assert!(matches!(
            repo.save(&feed).await,
            Err(Error::FeedNotFound(404))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = FeedRepository::new(&db);

        let stored = repo
            .save(&Feed::new("temp", vec![], FilterOptions::default()))
            .await
            .unwrap();

        assert!(repo.delete(stored.id.unwrap()).await.unwrap());
        assert!(!repo.delete(stored.id.unwrap()).await.unwrap());
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_falls_back_to_defaults() {
        let db = Database::new_in_memory().await.unwrap();

        sqlx::query("INSERT INTO feeds (name, folder_paths, filter_config) VALUES (?, ?, ?)")
            .bind("broken")
            .bind("not json")
            .bind("{nope")
            .execute(db.pool())
            .await
            .unwrap();

        let repo = FeedRepository::new(&db);
        let feeds = repo.list_all().await.unwrap();
        assert_eq!(feeds.len(), 1);
        assert!(feeds[0].folder_paths.is_empty());
        assert_eq!(feeds[0].filters, FilterOptions::default());
    }
}
