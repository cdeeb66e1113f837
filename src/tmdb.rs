use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TmdbConfig;
use crate::models::{Credits, DetailsBundle, MovieDetail, MovieSummary, Video};

pub const DEFAULT_FETCH_ERROR: &str = "Failed to fetch movies";
const DISCOVER_SORT: &str = "popularity.desc";

/// Failure of a search or discover request.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered but reported a failure in the body.
    #[error("{0}")]
    Reported(String),
    /// Network failure, non-2xx status or an unreadable body.
    #[error("Failed to fetch movies: {0:#}")]
    Transport(anyhow::Error),
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError>;
    async fn discover_movies(&self) -> Result<Vec<MovieSummary>, CatalogError>;
    async fn fetch_details(&self, id: i64) -> Result<DetailsBundle>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .context("TMDB token is not a valid header value")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("building TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", url, status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }

    async fn fetch_listing(&self, url: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let body: Value = self.get_json(url).await.map_err(CatalogError::Transport)?;
        parse_listing(body)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = format!(
            "{}/search/movie?query={}",
            self.base_url,
            urlencoding::encode(query)
        );
        self.fetch_listing(&url).await
    }

    async fn discover_movies(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = format!("{}/discover/movie?sort_by={DISCOVER_SORT}", self.base_url);
        self.fetch_listing(&url).await
    }

    async fn fetch_details(&self, id: i64) -> Result<DetailsBundle> {
        #[derive(Deserialize, Default)]
        struct VideoList {
            #[serde(default)]
            results: Vec<Video>,
        }
        #[derive(Deserialize, Default)]
        struct SimilarList {
            #[serde(default)]
            results: Vec<MovieSummary>,
        }

        let base = &self.base_url;
        let url_detail = format!("{base}/movie/{id}");
        let url_videos = format!("{base}/movie/{id}/videos");
        let url_credits = format!("{base}/movie/{id}/credits");
        let url_similar = format!("{base}/movie/{id}/similar");

        let (detail, videos, credits, similar) = tokio::join!(
            self.get_json::<MovieDetail>(&url_detail),
            self.get_json::<VideoList>(&url_videos),
            self.get_json::<Credits>(&url_credits),
            self.get_json::<SimilarList>(&url_similar),
        );

        let movie = detail.with_context(|| format!("fetching details for movie {id}"))?;
        let videos = or_empty(videos, "videos", id);
        let credits = or_empty(credits, "credits", id);
        let similar = or_empty(similar, "similar titles", id);
        debug!(
            movie_id = id,
            videos = videos.results.len(),
            cast = credits.cast.len(),
            similar = similar.results.len(),
            "Fetched details bundle"
        );

        Ok(DetailsBundle {
            movie,
            videos: videos.results,
            credits,
            similar: similar.results,
        })
    }
}

fn or_empty<T: Default>(result: Result<T>, what: &str, id: i64) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to fetch {} for movie {}: {:#}", what, id, e);
        T::default()
    })
}

/// Interprets a search/discover body. `{"Response": "False"}` is a reported
/// failure even though the transport succeeded.
pub fn parse_listing(body: Value) -> Result<Vec<MovieSummary>, CatalogError> {
    if body.get("Response").and_then(Value::as_str) == Some("False") {
        let message = body
            .get("Error")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_FETCH_ERROR);
        return Err(CatalogError::Reported(message.to_string()));
    }
    match body.get("results") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(results) => serde_json::from_value(results.clone())
            .context("JSON parse failed")
            .map_err(CatalogError::Transport),
    }
}

pub fn parse_movie_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|id| *id > 0)
}
