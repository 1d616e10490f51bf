mod filters;
mod models;

pub use filters::{
    FilterOptions, FilterUpdate, MediaKindFilter, OrientationFilter, SortBy, SortOrder,
};
pub use models::{normalize_path, Feed, Folder, MediaItem, MediaKind, NewMediaItem};
