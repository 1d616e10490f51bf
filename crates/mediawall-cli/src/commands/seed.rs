use anyhow::Result;
use chrono::{Duration, Utc};

use mediawall_core::media::{MediaKind, NewMediaItem};
use mediawall_core::storage::{Database, FolderRepository, MediaRepository};

/// Dimension pool biased towards landscape so the demo wall looks like a
/// real photo dump
const SHAPES: &[(u32, u32)] = &[
    (1920, 1080),
    (1080, 1920),
    (4032, 3024),
    (3024, 4032),
    (1280, 720),
    (800, 800),
    (2560, 1440),
    (1080, 1350),
];

pub async fn execute(db: Database, folder: &str, count: u32) -> Result<()> {
    let folders = FolderRepository::new(&db);
    folders.add(folder).await?;

    let media = MediaRepository::new(&db);
    let now = Utc::now();
    let mut inserted = 0u32;

    for i in 0..count {
        // every sixth item is a video, the rest are images
        let kind = if i % 6 == 5 {
            MediaKind::Video
        } else {
            MediaKind::Image
        };
        let ext = match kind {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        };
        let (width, height) = SHAPES[(i as usize) % SHAPES.len()];

        let item = NewMediaItem {
            path: format!("{folder}/sample_{i:04}.{ext}"),
            kind,
            size_bytes: 120_000 + i as i64 * 7_919,
            created_at: now - Duration::minutes(i as i64),
            width: Some(width),
            height: Some(height),
            duration_sec: match kind {
                MediaKind::Video => Some(5.0 + (i % 120) as f64),
                MediaKind::Image => None,
            },
        };

        media.insert(&item).await?;
        inserted += 1;
    }

    println!("Seeded {inserted} items under {folder}");
    println!("Run `mediawall` to browse them.");
    Ok(())
}
