use sqlx::FromRow;

use super::Database;
use crate::media::{normalize_path, Folder};
use crate::Result;

/// Repository for watched-folder CRUD
pub struct FolderRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct FolderRow {
    id: i64,
    path: String,
    is_active: bool,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Folder {
            id: row.id,
            path: row.path,
            is_active: row.is_active,
        }
    }
}

impl<'a> FolderRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<Folder>> {
        let rows: Vec<FolderRow> =
            sqlx::query_as("SELECT id, path, is_active FROM folders ORDER BY path ASC")
                .fetch_all(self.db.pool())
                .await?;

        Ok(rows.into_iter().map(Folder::from).collect())
    }

    /// Register a folder; duplicates by path are ignored
    pub async fn add(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);

        sqlx::query("INSERT OR IGNORE INTO folders (path) VALUES (?)")
            .bind(&path)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Remove a folder and every media item stored under it
    pub async fn remove(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);

        sqlx::query("DELETE FROM folders WHERE path = ?")
            .bind(&path)
            .execute(self.db.pool())
            .await?;

        sqlx::query("DELETE FROM media_items WHERE path LIKE ? OR path = ?")
            .bind(format!("{path}/%"))
            .bind(&path)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Include or exclude a folder from the home scope
    pub async fn set_active(&self, path: &str, is_active: bool) -> Result<()> {
        let path = normalize_path(path);

        sqlx::query("UPDATE folders SET is_active = ? WHERE path = ?")
            .bind(is_active)
            .bind(&path)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}
