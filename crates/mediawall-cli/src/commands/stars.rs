use anyhow::Result;

use mediawall_core::storage::{Database, MediaRepository};

pub async fn clear(db: Database) -> Result<()> {
    let repo = MediaRepository::new(&db);
    let cleared = repo.clear_starred().await?;
    println!("Unstarred {cleared} items");
    Ok(())
}
