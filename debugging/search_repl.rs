//! Type queries line by line and watch the debounced search view settle.
//! Usage:
//!   cargo run --bin search_repl
//! Requires TMDB_API_KEY; tallies go to Appwrite when APPWRITE_* is set,
//! otherwise they are kept in memory.

use anyhow::Result;
use dotenvy::dotenv;
use std::time::Duration;
use streamvibe::app::AppState;
use streamvibe::config::Config;
use streamvibe::search::{SearchView, DEBOUNCE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;
    let view = SearchView::spawn(state.tmdb, state.tally);

    let mut updates = view.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.is_loading {
                println!("... loading '{}'", snapshot.query);
                continue;
            }
            if let Some(message) = &snapshot.error_message {
                println!("!! {}", message);
                continue;
            }
            println!("== {} result(s) for '{}'", snapshot.movies.len(), snapshot.query);
            for movie in snapshot.movies.iter().take(10) {
                println!("   {:>8}  {}", movie.id, movie.title);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        view.set_query(line);
    }
    // Let the last query settle before the view is dropped.
    tokio::time::sleep(DEBOUNCE + Duration::from_secs(3)).await;
    Ok(())
}
