use anyhow::Result;

use mediawall_core::media::{normalize_path, Feed, FilterOptions};
use mediawall_core::storage::{Database, FeedRepository};

pub async fn list(db: Database) -> Result<()> {
    let repo = FeedRepository::new(&db);
    let feeds = repo.list_all().await?;

    if feeds.is_empty() {
        println!("No saved feeds. Add one with: mediawall feeds add <name> --folder <path>");
        return Ok(());
    }

    for feed in feeds {
        println!(
            "[{}] {} ({} folders, sort {:?} {:?})",
            feed.id.unwrap_or(0),
            feed.name,
            feed.folder_paths.len(),
            feed.filters.sort_by,
            feed.filters.sort_order,
        );
    }

    Ok(())
}

/// Create a saved feed over the given folder set, starting from default
/// filters; sort and bounds are edited live from the gallery afterwards
pub async fn add(db: Database, name: &str, folders: &[String]) -> Result<()> {
    let folder_paths: Vec<String> = folders.iter().map(|p| normalize_path(p)).collect();

    let repo = FeedRepository::new(&db);
    let stored = repo
        .save(&Feed::new(name, folder_paths, FilterOptions::default()))
        .await?;

    println!(
        "Saved feed [{}] {} over {} folders",
        stored.id.unwrap_or(0),
        stored.name,
        stored.folder_paths.len(),
    );
    Ok(())
}

pub async fn delete(db: Database, id: i64) -> Result<()> {
    let repo = FeedRepository::new(&db);
    if repo.delete(id).await? {
        println!("Deleted feed {id}");
    } else {
        println!("No feed with id {id}");
    }
    Ok(())
}
