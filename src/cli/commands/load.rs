//! Load dataset command handler

use std::path::Path;

use crate::config::Config;
use crate::services::ingest::{self, LoadOutcome};

pub async fn cmd_load(config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let path = path.unwrap_or(config.ingest.csv_path.as_path());

    match ingest::run_load(config, path).await? {
        LoadOutcome::Skipped { existing } => {
            println!("Catalog already holds {existing} shows; nothing loaded.");
        }
        LoadOutcome::Loaded(summary) => {
            println!(
                "Loaded {} shows, {} categories, {} ratings.",
                summary.shows, summary.categories, summary.ratings
            );
        }
    }

    Ok(())
}
