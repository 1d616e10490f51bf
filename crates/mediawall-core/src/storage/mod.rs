mod database;
mod feed_repo;
mod folder_repo;
mod media_repo;
mod store;

pub use database::Database;
pub use feed_repo::FeedRepository;
pub use folder_repo::FolderRepository;
pub use media_repo::MediaRepository;
pub use store::LibraryStore;
