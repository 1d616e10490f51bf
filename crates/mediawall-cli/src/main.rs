use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediawall_core::{storage::Database, AppConfig};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "mediawall")]
#[command(author, version, about = "A continuously-scrolling terminal media gallery")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gallery TUI
    Run,
    /// Manage watched folders
    Folders {
        #[command(subcommand)]
        action: FolderAction,
    },
    /// Manage saved feeds
    Feeds {
        #[command(subcommand)]
        action: FeedAction,
    },
    /// Manage starred items
    Stars {
        #[command(subcommand)]
        action: StarAction,
    },
    /// Insert synthetic media rows for trying the gallery out
    Seed {
        /// Folder path the synthetic items are filed under
        #[arg(short, long, default_value = "/demo")]
        folder: String,
        /// How many items to insert
        #[arg(short, long, default_value_t = 200)]
        count: u32,
    },
}

#[derive(Subcommand, Debug)]
enum FolderAction {
    /// List watched folders
    List,
    /// Watch a folder
    Add { path: String },
    /// Stop watching a folder and drop its items
    Remove { path: String },
    /// Include or exclude a folder from the home feed
    SetActive {
        path: String,
        #[arg(long)]
        active: bool,
    },
}

#[derive(Subcommand, Debug)]
enum FeedAction {
    /// List saved feeds
    List,
    /// Save a new feed over a set of folders
    Add {
        name: String,
        /// Folder scope; repeat for multiple folders
        #[arg(short, long = "folder", required = true)]
        folders: Vec<String>,
    },
    /// Delete a saved feed
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum StarAction {
    /// Unstar every item, emptying the favorites feed
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let db = Database::new(&config).await?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::execute(config, db).await,
        Commands::Folders { action } => match action {
            FolderAction::List => commands::folders::list(db).await,
            FolderAction::Add { path } => commands::folders::add(db, &path).await,
            FolderAction::Remove { path } => commands::folders::remove(db, &path).await,
            FolderAction::SetActive { path, active } => {
                commands::folders::set_active(db, &path, active).await
            }
        },
        Commands::Feeds { action } => match action {
            FeedAction::List => commands::feeds::list(db).await,
            FeedAction::Add { name, folders } => commands::feeds::add(db, &name, &folders).await,
            FeedAction::Delete { id } => commands::feeds::delete(db, id).await,
        },
        Commands::Stars { action } => match action {
            StarAction::Clear => commands::stars::clear(db).await,
        },
        Commands::Seed { folder, count } => commands::seed::execute(db, &folder, count).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feeds_add_takes_repeated_folders() {
        let cli = Cli::try_parse_from([
            "mediawall", "feeds", "add", "trips", "--folder", "/a", "--folder", "/b",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Feeds {
                action: FeedAction::Add { name, folders },
            }) => {
                assert_eq!(name, "trips");
                assert_eq!(folders, vec!["/a".to_string(), "/b".into()]);
            }
            other => panic!("parsed as {other:?}"),
        }
    }

    #[test]
    fn test_feeds_add_requires_a_folder() {
        assert!(Cli::try_parse_from(["mediawall", "feeds", "add", "trips"]).is_err());
    }

    #[test]
    fn test_stars_clear_parses() {
        let cli = Cli::try_parse_from(["mediawall", "stars", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Stars {
                action: StarAction::Clear
            })
        ));
    }
}
