//! Fetch the details bundle for a movie and print the derived page as JSON.
//! Usage:
//!   cargo run --bin tmdb_props -- <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use streamvibe::config::{TmdbConfig, DEFAULT_TMDB_BASE};
use streamvibe::details::DetailsPage;
use streamvibe::tmdb::{parse_movie_id, TmdbApi, TmdbClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let raw_id = env::args()
        .nth(1)
        .context("usage: tmdb_props <tmdb_id>")?;
    let id = parse_movie_id(&raw_id).context("movie id must be a positive integer")?;

    let config = TmdbConfig {
        base_url: env::var("TMDB_BASE_URL").unwrap_or_else(|_| DEFAULT_TMDB_BASE.to_string()),
        token: env::var("TMDB_API_KEY").context("Missing TMDB_API_KEY in environment")?,
    };
    let client = TmdbClient::new(&config)?;

    let bundle = client.fetch_details(id).await?;
    println!(
        "videos={} cast={} crew={} similar={}",
        bundle.videos.len(),
        bundle.credits.cast.len(),
        bundle.credits.crew.len(),
        bundle.similar.len()
    );
    let page = DetailsPage::from_bundle(&bundle);
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
