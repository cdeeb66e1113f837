use serde::Serialize;
use tracing::{error, info};

use crate::tally::{TallyApi, TallyRecord, TRENDING_LIMIT};

pub const NO_TRENDING_MESSAGE: &str = "No trending movies found";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum TrendingState {
    /// Before the store has answered.
    #[default]
    Loading,
    /// The store answered with no records.
    Empty,
    /// The store could not be read; shown as an empty list.
    Failed,
    Populated(Vec<TallyRecord>),
}

impl TrendingState {
    pub async fn load(tally: &dyn TallyApi) -> Self {
        match tally.top_hits(TRENDING_LIMIT).await {
            Ok(records) if records.is_empty() => TrendingState::Empty,
            Ok(records) => {
                info!("Loaded {} trending searches", records.len());
                TrendingState::Populated(records)
            }
            Err(e) => {
                error!("Error loading trending movies: {:#}", e);
                TrendingState::Failed
            }
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            TrendingState::Empty => Some(NO_TRENDING_MESSAGE),
            _ => None,
        }
    }

    pub fn records(&self) -> &[TallyRecord] {
        match self {
            TrendingState::Populated(records) => records,
            _ => &[],
        }
    }
}
