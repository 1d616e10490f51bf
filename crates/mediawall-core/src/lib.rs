pub mod autoscroll;
pub mod config;
pub mod error;
pub mod layout;
pub mod media;
pub mod session;
pub mod source;
pub mod storage;
pub mod viewport;

pub use autoscroll::AutoscrollDriver;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use layout::{layout, Layout, Position};
pub use session::{ActiveFeed, FeedSession, FetchTicket, PageState};
pub use source::MediaSource;
pub use viewport::{visible_indices, ViewportTracker};
