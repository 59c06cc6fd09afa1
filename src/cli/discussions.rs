//! Discussion store commands.

use anyhow::{Context, Result};
use clap::Subcommand;

use carematch::candidates::Discussion;
use carematch::config::Config;
use carematch::discussions::{DiscussionRepository, JsonDiscussionStore};

#[derive(Subcommand, Debug)]
pub(crate) enum DiscussionAction {
    /// List stored discussions
    List,
    /// Add a discussion
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long)]
        author: Option<String>,
    },
}

pub(crate) fn cmd_discussions(config: Config, action: DiscussionAction) -> Result<()> {
    let path = config.discussions_path();
    let mut store = JsonDiscussionStore::with_path(path.clone())
        .with_context(|| format!("Failed to open discussion store at {}", path.display()))?;

    match action {
        DiscussionAction::List => {
            let entries = store.list()?;
            if entries.is_empty() {
                println!("No discussions stored in {}", path.display());
            }
            for d in entries {
                println!("{}  {}", d.id, d.title);
            }
        }
        DiscussionAction::Add {
            title,
            body,
            author,
        } => {
            let stored = store.append(Discussion {
                title,
                body,
                author,
                ..Default::default()
            })?;
            println!("Added discussion {}", stored.id);
        }
    }

    Ok(())
}
