use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use super::Database;
use crate::media::{
    FilterOptions, MediaItem, MediaKind, MediaKindFilter, NewMediaItem, OrientationFilter, SortBy,
    SortOrder,
};
use crate::{Error, Result};

/// Repository for media item queries and mutations
pub struct MediaRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct MediaRow {
    id: i64,
    path: String,
    file_type: String,
    size_bytes: i64,
    created_at: DateTime<Utc>,
    width: Option<i64>,
    height: Option<i64>,
    duration_sec: Option<f64>,
    starred: bool,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        MediaItem {
            id: row.id,
            path: row.path,
            kind: MediaKind::parse(&row.file_type),
            size_bytes: row.size_bytes,
            created_at: row.created_at,
            width: row.width.map(|w| w as u32),
            height: row.height.map(|h| h as u32),
            duration_sec: row.duration_sec,
            starred: row.starred,
        }
    }
}

impl<'a> MediaRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Fetch one page of the index for the given filter snapshot.
    ///
    /// Ordering is entirely the query's: the caller appends pages in the
    /// order they come back and never re-sorts.
    pub async fn fetch(
        &self,
        limit: u32,
        offset: u32,
        filters: &FilterOptions,
    ) -> Result<Vec<MediaItem>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, path, file_type, size_bytes, created_at, width, height, duration_sec, starred \
             FROM media_items",
        );

        push_where(&mut qb, filters);
        push_order(&mut qb, filters);

        qb.push(" LIMIT ").push_bind(limit as i64);
        qb.push(" OFFSET ").push_bind(offset as i64);

        let rows: Vec<MediaRow> = qb.build_query_as().fetch_all(self.db.pool()).await?;
        Ok(rows.into_iter().map(MediaItem::from).collect())
    }

    /// Register a media item, ignoring duplicates by path.
    /// Returns the stored item.
    pub async fn insert(&self, new: &NewMediaItem) -> Result<MediaItem> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO media_items
                (path, file_type, size_bytes, created_at, width, height, duration_sec)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.path)
        .bind(new.kind.as_str())
        .bind(new.size_bytes)
        .bind(new.created_at)
        .bind(new.width.map(|w| w as i64))
        .bind(new.height.map(|h| h as i64))
        .bind(new.duration_sec)
        .execute(self.db.pool())
        .await?;

        let row: MediaRow = sqlx::query_as(
            r#"
            SELECT id, path, file_type, size_bytes, created_at, width, height, duration_sec, starred
            FROM media_items
            WHERE path = ?
            "#,
        )
        .bind(&new.path)
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.into())
    }

    /// Flip the starred flag, returning the new state
    pub async fn toggle_star(&self, id: i64) -> Result<bool> {
        let current: Option<(bool,)> =
            sqlx::query_as("SELECT starred FROM media_items WHERE id = ?")
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?;

        let current = current.ok_or(Error::MediaNotFound(id))?.0;
        let new_status = !current;

        sqlx::query("UPDATE media_items SET starred = ? WHERE id = ?")
            .bind(new_status)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(new_status)
    }

    /// Write-through dimension correction from the rendering layer
    pub async fn set_dimensions(&self, id: i64, width: u32, height: u32) -> Result<()> {
        sqlx::query("UPDATE media_items SET width = ?, height = ? WHERE id = ?")
            .bind(width as i64)
            .bind(height as i64)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Unstar everything
    pub async fn clear_starred(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE media_items SET starred = 0 WHERE starred = 1")
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Total item count
    pub async fn count(&self) -> Result<u32> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media_items")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count.0 as u32)
    }
}

/// Translate the filter snapshot into WHERE clauses
fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, filters: &FilterOptions) {
    let mut first = true;
    macro_rules! clause {
        () => {
            if first {
                qb.push(" WHERE ");
                first = false;
            } else {
                qb.push(" AND ");
            }
        };
    }

    if filters.favorites_only == Some(true) {
        clause!();
        qb.push("starred = 1");
    }

    if let Some(paths) = &filters.folder_paths {
        if !paths.is_empty() {
            clause!();
            qb.push("(");
            for (i, path) in paths.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push("path LIKE ").push_bind(format!("{path}%"));
            }
            qb.push(")");
        }
    }

    match filters.media_type {
        MediaKindFilter::All => {}
        MediaKindFilter::Image => {
            clause!();
            qb.push("file_type = 'image'");
        }
        MediaKindFilter::Video => {
            clause!();
            qb.push("file_type = 'video'");
        }
    }

    match filters.orientation {
        OrientationFilter::All => {}
        OrientationFilter::Horizontal => {
            clause!();
            qb.push("width > height");
        }
        OrientationFilter::Vertical => {
            clause!();
            qb.push("width < height");
        }
        OrientationFilter::Square => {
            clause!();
            qb.push("width = height");
        }
    }

    if let Some(min_w) = filters.min_width {
        clause!();
        qb.push("width >= ").push_bind(min_w as i64);
    }
    if let Some(min_h) = filters.min_height {
        clause!();
        qb.push("height >= ").push_bind(min_h as i64);
    }
    // Items with unknown duration (images, unparsed videos) pass duration
    // bounds rather than silently disappearing.
    if let Some(min_d) = filters.min_duration {
        if min_d > 0.0 {
            clause!();
            qb.push("(duration_sec >= ")
                .push_bind(min_d)
                .push(" OR duration_sec IS NULL)");
        }
    }
    if let Some(max_d) = filters.max_duration {
        if max_d > 0.0 {
            clause!();
            qb.push("(duration_sec <= ")
                .push_bind(max_d)
                .push(" OR duration_sec IS NULL)");
        }
    }
    if let Some(min_s) = filters.min_size {
        clause!();
        qb.push("size_bytes >= ").push_bind(min_s);
    }
    if let Some(max_s) = filters.max_size {
        clause!();
        qb.push("size_bytes <= ").push_bind(max_s);
    }

    if let Some(exts) = &filters.extensions {
        if !exts.is_empty() {
            clause!();
            qb.push("(");
            for (i, ext) in exts.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push("path LIKE ")
                    .push_bind(format!("%.{}", ext.to_lowercase()));
            }
            qb.push(")");
        }
    }
}

/// Translate sort settings into an ORDER BY clause
fn push_order(qb: &mut QueryBuilder<'_, Sqlite>, filters: &FilterOptions) {
    let sort_col = match filters.sort_by {
        SortBy::CreatedAt => "created_at",
        SortBy::Filename => "path",
        SortBy::SizeBytes => "size_bytes",
        SortBy::Resolution => "(width * height)",
        SortBy::DurationSec => "duration_sec",
        SortBy::Random => {
            // Direction is meaningless for a shuffle
            qb.push(" ORDER BY RANDOM()");
            return;
        }
    };

    let order = match filters.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    qb.push(format!(" ORDER BY {sort_col} {order}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_item(path: &str, kind: MediaKind, size: i64, secs: i64) -> NewMediaItem {
        NewMediaItem {
            path: path.into(),
            kind,
            size_bytes: size,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            width: None,
            height: None,
            duration_sec: None,
        }
    }

    async fn seed(db: &Database) {
        let repo = MediaRepository::new(db);
        let mut a = new_item("/pics/a.jpg", MediaKind::Image, 100, 1000);
        a.width = Some(1920);
        a.height = Some(1080);
        let mut b = new_item("/pics/b.png", MediaKind::Image, 300, 2000);
        b.width = Some(600);
        b.height = Some(800);
        let mut c = new_item("/vids/c.mp4", MediaKind::Video, 9000, 3000);
        c.duration_sec = Some(12.5);
        let d = new_item("/vids/d.webm", MediaKind::Video, 500, 4000);

        for item in [&a, &b, &c, &d] {
            repo.insert(item).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_default_sort_is_created_desc() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let items = repo.fetch(50, 0, &FilterOptions::default()).await.unwrap();
        let paths: Vec<_> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/vids/d.webm", "/vids/c.mp4", "/pics/b.png", "/pics/a.jpg"]);
    }

    #[tokio::test]
    async fn test_limit_and_offset_page_through() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let page1 = repo.fetch(2, 0, &FilterOptions::default()).await.unwrap();
        let page2 = repo.fetch(2, 2, &FilterOptions::default()).await.unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);
        assert_ne!(page1[0].id, page2[0].id);

        let page3 = repo.fetch(2, 4, &FilterOptions::default()).await.unwrap();
        assert!(page3.is_empty());
    }

    #[tokio::test]
    async fn test_folder_scope_is_a_prefix_match() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let filters = FilterOptions {
            folder_paths: Some(vec!["/pics".into()]),
            ..Default::default()
        };
        let items = repo.fetch(50, 0, &filters).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.path.starts_with("/pics")));
    }

    #[tokio::test]
    async fn test_media_type_and_extension_filters() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let videos = repo
            .fetch(
                50,
                0,
                &FilterOptions {
                    media_type: MediaKindFilter::Video,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|i| i.kind == MediaKind::Video));

        let jpgs = repo
            .fetch(
                50,
                0,
                &FilterOptions {
                    extensions: Some(vec!["JPG".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(jpgs.len(), 1);
        assert_eq!(jpgs[0].path, "/pics/a.jpg");
    }

    #[tokio::test]
    async fn test_orientation_filter() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let horizontal = repo
            .fetch(
                50,
                0,
                &FilterOptions {
                    orientation: OrientationFilter::Horizontal,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(horizontal.len(), 1);
        assert_eq!(horizontal[0].path, "/pics/a.jpg");

        let vertical = repo
            .fetch(
                50,
                0,
                &FilterOptions {
                    orientation: OrientationFilter::Vertical,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(vertical.len(), 1);
        assert_eq!(vertical[0].path, "/pics/b.png");
    }

    #[tokio::test]
    async fn test_duration_bounds_admit_null_durations() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let filters = FilterOptions {
            media_type: MediaKindFilter::Video,
            min_duration: Some(5.0),
            ..Default::default()
        };
        let items = repo.fetch(50, 0, &filters).await.unwrap();
        // c.mp4 passes the bound, d.webm passes because its duration is unknown
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_size_bounds_and_sort_by_size() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let filters = FilterOptions {
            min_size: Some(200),
            max_size: Some(1000),
            sort_by: SortBy::SizeBytes,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let items = repo.fetch(50, 0, &filters).await.unwrap();
        let sizes: Vec<_> = items.iter().map(|i| i.size_bytes).collect();
        assert_eq!(sizes, vec![300, 500]);
    }

    #[tokio::test]
    async fn test_toggle_star_and_favorites_filter() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let all = repo.fetch(50, 0, &FilterOptions::default()).await.unwrap();
        let id = all[0].id;

        assert!(repo.toggle_star(id).await.unwrap());
        let starred = repo
            .fetch(
                50,
                0,
                &FilterOptions {
                    favorites_only: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(starred.len(), 1);
        assert_eq!(starred[0].id, id);

        assert!(!repo.toggle_star(id).await.unwrap());
        assert_eq!(repo.clear_starred().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_toggle_star_unknown_id() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = MediaRepository::new(&db);
        assert!(matches!(
            repo.toggle_star(12345).await,
            Err(Error::MediaNotFound(12345))
        ));
    }

    #[tokio::test]
    async fn test_set_dimensions_round_trip() {
        let db = Database::new_in_memory().await.unwrap();
        seed(&db).await;
        let repo = MediaRepository::new(&db);

        let filters = FilterOptions {
            media_type: MediaKindFilter::Video,
            sort_by: SortBy::Filename,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let vids = repo.fetch(50, 0, &filters).await.unwrap();
        let id = vids[0].id;
        assert_eq!(vids[0].width, None);

        repo.set_dimensions(id, 1280, 720).await.unwrap();
        let vids = repo.fetch(50, 0, &filters).await.unwrap();
        assert_eq!(vids[0].width, Some(1280));
        assert_eq!(vids[0].height, Some(720));
    }
}
