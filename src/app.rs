use crate::config::Config;
use crate::details::DetailsState;
use crate::render;
use crate::search::SearchState;
use crate::tally::{AppwriteTally, MemoryTally, TallyApi};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::trending::TrendingState;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub tally: Arc<dyn TallyApi>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config.tmdb)?);
        let tally: Arc<dyn TallyApi> = match &config.tally {
            Some(appwrite) => Arc::new(AppwriteTally::new(appwrite)?),
            None => {
                warn!("No tally backend configured, using in-memory store");
                Arc::new(MemoryTally::new())
            }
        };
        Ok(Self { tmdb, tally })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsParams {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub trailer: Option<String>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/movie-details", get(movie_details))
        .route("/api/movies", get(api_movies))
        .route("/api/trending", get(api_trending))
        .route("/api/movie-details", get(api_movie_details))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Html<String> {
    let query = params.query.unwrap_or_default();
    // Trending and search load independently of each other.
    let (trending, search) = tokio::join!(
        TrendingState::load(state.tally.as_ref()),
        SearchState::load(state.tmdb.as_ref(), state.tally.as_ref(), &query),
    );
    Html(render::home_page(&query, &trending, &search))
}

async fn movie_details(
    State(state): State<AppState>,
    Query(params): Query<DetailsParams>,
) -> Html<String> {
    let mut details = DetailsState::load(state.tmdb.as_ref(), params.id.as_deref()).await;
    if params.trailer.as_deref() == Some("1") {
        if let Some(page) = details.page_mut() {
            page.trailer.open();
        }
    }
    Html(render::details_page(&details))
}

async fn api_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchState> {
    let query = params.query.unwrap_or_default();
    Json(SearchState::load(state.tmdb.as_ref(), state.tally.as_ref(), &query).await)
}

async fn api_trending(State(state): State<AppState>) -> Json<serde_json::Value> {
    let trending = TrendingState::load(state.tally.as_ref()).await;
    Json(serde_json::json!({
        "state": trending,
        "message": trending.message(),
    }))
}

async fn api_movie_details(
    State(state): State<AppState>,
    Query(params): Query<DetailsParams>,
) -> Json<DetailsState> {
    Json(DetailsState::load(state.tmdb.as_ref(), params.id.as_deref()).await)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
