use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

/// Process configuration, read once at startup and handed to the clients.
#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub tally: Option<AppwriteConfig>,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
        let base_url = optional("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string());
        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        Ok(Self {
            tmdb: TmdbConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
            },
            tally: AppwriteConfig::from_env()?,
            bind_addr,
        })
    }
}

impl AppwriteConfig {
    /// `Ok(None)` when no endpoint is configured.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(endpoint) = optional("APPWRITE_ENDPOINT") else {
            warn!("APPWRITE_ENDPOINT not set - search tallies will be kept in memory");
            return Ok(None);
        };
        let config = Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: env::var("APPWRITE_PROJECT_ID").context("APPWRITE_PROJECT_ID not set")?,
            api_key: optional("APPWRITE_API_KEY"),
            database_id: env::var("APPWRITE_DATABASE_ID")
                .context("APPWRITE_DATABASE_ID not set")?,
            collection_id: env::var("APPWRITE_COLLECTION_ID")
                .context("APPWRITE_COLLECTION_ID not set")?,
        };
        info!("Search tallies stored in Appwrite at {}", config.endpoint);
        Ok(Some(config))
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
