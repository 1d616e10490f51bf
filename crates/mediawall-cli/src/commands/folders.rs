use anyhow::Result;

use mediawall_core::storage::{Database, FolderRepository};

pub async fn list(db: Database) -> Result<()> {
    let repo = FolderRepository::new(&db);
    let folders = repo.list_all().await?;

    if folders.is_empty() {
        println!("No folders configured. Add one with: mediawall folders add <path>");
        return Ok(());
    }

    for folder in folders {
        let marker = if folder.is_active { "*" } else { " " };
        println!("{} [{}] {}", marker, folder.id, folder.path);
    }

    Ok(())
}

pub async fn add(db: Database, path: &str) -> Result<()> {
    let repo = FolderRepository::new(&db);
    repo.add(path).await?;
    println!("Watching {path}");
    Ok(())
}

pub async fn remove(db: Database, path: &str) -> Result<()> {
    let repo = FolderRepository::new(&db);
    repo.remove(path).await?;
    println!("Removed {path} and its items");
    Ok(())
}

pub async fn set_active(db: Database, path: &str, active: bool) -> Result<()> {
    let repo = FolderRepository::new(&db);
    repo.set_active(path, active).await?;
    println!(
        "{} {path} in the home feed",
        if active { "Including" } else { "Excluding" }
    );
    Ok(())
}
