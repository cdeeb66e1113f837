use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::{normalize_term, poster_for, TallyApi, TallyRecord};
use crate::models::MovieSummary;

/// In-process tally store, used when no Appwrite backend is configured.
/// Counts are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryTally {
    records: Mutex<HashMap<String, TallyRecord>>,
}

impl MemoryTally {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TallyApi for MemoryTally {
    async fn record_hit(&self, query: &str, movie: &MovieSummary) -> Result<()> {
        let term = normalize_term(query);
        let mut guard = self.records.lock().await;
        let entry = guard.entry(term.clone()).or_insert_with(|| TallyRecord {
            id: Some(format!("mem-{}", term)),
            search_term: term,
            count: 0,
            movie_id: None,
            poster_url: None,
            title: None,
        });
        entry.count += 1;
        entry.movie_id = Some(movie.id);
        entry.poster_url = poster_for(movie);
        entry.title = Some(movie.title.clone());
        debug!("Tally for '{}' is now {}", entry.search_term, entry.count);
        Ok(())
    }

    async fn top_hits(&self, limit: usize) -> Result<Vec<TallyRecord>> {
        let guard = self.records.lock().await;
        let mut records: Vec<TallyRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.search_term.cmp(&b.search_term))
        });
        records.truncate(limit);
        Ok(records)
    }
}
