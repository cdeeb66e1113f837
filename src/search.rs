//! The search view: raw input is debounced, the settled value is fetched,
//! and the result is folded into a [`SearchState`].
//!
//! Every fetch is tagged with a generation number. Only the response for the
//! latest generation is applied; older ones are dropped when they arrive.
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use crate::models::MovieSummary;
use crate::tally::TallyApi;
use crate::tmdb::{CatalogError, TmdbApi};

pub const DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchState {
    /// Query of the last issued fetch (empty for discover). After a transport
    /// failure `movies` still holds the results of an earlier query.
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl SearchState {
    /// One-shot search or discover, as used by the page routes.
    pub async fn load(tmdb: &dyn TmdbApi, tally: &dyn TallyApi, query: &str) -> Self {
        let mut state = SearchState::default();
        state.begin(query);
        let result = fetch_movies(tmdb, tally, query).await;
        state.apply(result);
        state
    }

    pub fn begin(&mut self, query: &str) {
        self.query = query.to_string();
        self.is_loading = true;
        self.error_message = None;
    }

    /// Reported failures replace the list with a message. Transport failures
    /// are only logged and leave the previous list in place.
    pub fn apply(&mut self, result: Result<Vec<MovieSummary>, CatalogError>) {
        match result {
            Ok(movies) => {
                self.movies = movies;
            }
            Err(CatalogError::Reported(message)) => {
                self.error_message = Some(message);
                self.movies.clear();
            }
            Err(err @ CatalogError::Transport(_)) => {
                error!("Error fetching movies: {:#}", err);
            }
        }
        self.is_loading = false;
    }
}

pub fn is_discover(query: &str) -> bool {
    query.trim().is_empty()
}

/// Searches (or discovers, for a blank query). A non-empty search with at
/// least one result records a tally hit for its first result; a failure to
/// record is logged and does not affect the outcome.
pub async fn fetch_movies(
    tmdb: &dyn TmdbApi,
    tally: &dyn TallyApi,
    query: &str,
) -> Result<Vec<MovieSummary>, CatalogError> {
    if is_discover(query) {
        return tmdb.discover_movies().await;
    }

    let movies = tmdb.search_movies(query).await?;
    if let Some(first) = movies.first() {
        if let Err(e) = tally.record_hit(query, first).await {
            error!("Failed to record search for '{}': {:#}", query, e);
        }
    }
    Ok(movies)
}

/// A live search view. Input goes in through [`SearchView::set_query`]; state
/// comes out through [`SearchView::subscribe`]. Dropping the view stops its
/// driver and any fetch still in flight.
pub struct SearchView {
    input: watch::Sender<String>,
    state: watch::Receiver<SearchState>,
    driver: JoinHandle<()>,
}

impl SearchView {
    pub fn spawn(tmdb: Arc<dyn TmdbApi>, tally: Arc<dyn TallyApi>) -> Self {
        Self::with_debounce(tmdb, tally, DEBOUNCE)
    }

    pub fn with_debounce(
        tmdb: Arc<dyn TmdbApi>,
        tally: Arc<dyn TallyApi>,
        debounce: Duration,
    ) -> Self {
        let (input, mut input_rx) = watch::channel(String::new());
        // Mark the mount value seen here; anything set before the driver
        // first runs must arrive through `changed()` and be debounced.
        let mounted = input_rx.borrow_and_update().clone();
        let (state_tx, state) = watch::channel(SearchState::default());
        let driver = tokio::spawn(drive(tmdb, tally, input_rx, state_tx, mounted, debounce));
        Self {
            input,
            state,
            driver,
        }
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.input.send_replace(text.into());
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }
}

impl Drop for SearchView {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

type FetchResult = (u64, Result<Vec<MovieSummary>, CatalogError>);

async fn drive(
    tmdb: Arc<dyn TmdbApi>,
    tally: Arc<dyn TallyApi>,
    mut input: watch::Receiver<String>,
    state: watch::Sender<SearchState>,
    mut committed: String,
    debounce: Duration,
) {
    let mut fetches: JoinSet<FetchResult> = JoinSet::new();
    let mut generation: u64 = 0;
    let mut deadline: Option<Instant> = None;

    // Mount: the initial value is committed without waiting.
    issue(&tmdb, &tally, &state, &mut fetches, &mut generation, &committed);

    loop {
        tokio::select! {
            changed = input.changed() => {
                if changed.is_err() {
                    break;
                }
                deadline = Some(Instant::now() + debounce);
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                let settled = input.borrow_and_update().clone();
                if settled != committed {
                    committed = settled;
                    issue(&tmdb, &tally, &state, &mut fetches, &mut generation, &committed);
                }
            }
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                match joined {
                    Ok((issued, result)) if issued == generation => {
                        state.send_modify(|s| s.apply(result));
                    }
                    Ok((issued, _)) => {
                        debug!(issued, latest = generation, "Discarding stale search response");
                    }
                    Err(e) => error!("Search task failed: {}", e),
                }
            }
        }
    }
    debug!("Search view closed");
}

fn issue(
    tmdb: &Arc<dyn TmdbApi>,
    tally: &Arc<dyn TallyApi>,
    state: &watch::Sender<SearchState>,
    fetches: &mut JoinSet<FetchResult>,
    generation: &mut u64,
    query: &str,
) {
    *generation += 1;
    let issued = *generation;
    if is_discover(query) {
        info!(generation = issued, "Loading popular movies");
    } else {
        info!(generation = issued, "Searching for '{}'", query);
    }
    state.send_modify(|s| s.begin(query));

    let tmdb = Arc::clone(tmdb);
    let tally = Arc::clone(tally);
    let query = query.to_string();
    fetches.spawn(async move {
        let result = fetch_movies(tmdb.as_ref(), tally.as_ref(), &query).await;
        (issued, result)
    });
}
