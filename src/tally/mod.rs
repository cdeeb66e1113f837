//! Search tallies: a counter per search term plus the poster and title of the
//! most recent top hit, used to build the trending list.
use anyhow::Result;
use async_trait::async_trait;

use crate::models::{image_url, MovieSummary};

mod appwrite;
mod memory;

pub use appwrite::AppwriteTally;
pub use memory::MemoryTally;

pub use crate::models::TallyRecord;

pub const TRENDING_LIMIT: usize = 5;
pub const TALLY_POSTER_SIZE: &str = "w500";

#[async_trait]
pub trait TallyApi: Send + Sync {
    /// Increments the counter for `query`, creating it at 1 if needed, and
    /// overwrites the stored poster/title with `movie`'s.
    async fn record_hit(&self, query: &str, movie: &MovieSummary) -> Result<()>;
    /// Records ordered by count, highest first.
    async fn top_hits(&self, limit: usize) -> Result<Vec<TallyRecord>>;
}

/// Key under which a query is counted.
pub fn normalize_term(query: &str) -> String {
    query.trim().to_string()
}

pub(crate) fn poster_for(movie: &MovieSummary) -> Option<String> {
    image_url(movie.poster_path.as_deref(), TALLY_POSTER_SIZE)
}
