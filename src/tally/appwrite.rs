use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{normalize_term, poster_for, TallyApi, TallyRecord};
use crate::config::AppwriteConfig;
use crate::models::MovieSummary;

/// Tally store backed by an Appwrite collection with the attributes
/// `searchTerm`, `count`, `movie_id`, `poster_url` and `title`.
#[derive(Debug, Clone)]
pub struct AppwriteTally {
    client: Client,
    documents_url: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TallyDocument>,
}

#[derive(Debug, Deserialize)]
struct TallyDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    movie_id: Option<i64>,
    #[serde(default)]
    poster_url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl From<TallyDocument> for TallyRecord {
    fn from(doc: TallyDocument) -> Self {
        TallyRecord {
            id: Some(doc.id),
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            poster_url: doc.poster_url,
            title: doc.title,
        }
    }
}

impl AppwriteTally {
    pub fn new(config: &AppwriteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-appwrite-project",
            HeaderValue::from_str(&config.project_id).context("invalid Appwrite project id")?,
        );
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key).context("invalid Appwrite API key")?;
            value.set_sensitive(true);
            headers.insert("x-appwrite-key", value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("building Appwrite HTTP client")?;
        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.database_id,
            config.collection_id
        );
        Ok(Self {
            client,
            documents_url,
        })
    }

    async fn list(&self, queries: &[Value]) -> Result<Vec<TallyDocument>> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();
        let body = send(self.client.get(&self.documents_url).query(&params)).await?;
        let list: DocumentList =
            serde_json::from_value(body).context("Unexpected document list from Appwrite")?;
        Ok(list.documents)
    }
}

#[async_trait]
impl TallyApi for AppwriteTally {
    async fn record_hit(&self, query: &str, movie: &MovieSummary) -> Result<()> {
        let term = normalize_term(query);
        let existing = self
            .list(&[
                json!({"method": "equal", "attribute": "searchTerm", "values": [term]}),
                json!({"method": "limit", "values": [1]}),
            ])
            .await?;

        let poster_url = poster_for(movie);
        if let Some(doc) = existing.into_iter().next() {
            let url = format!("{}/{}", self.documents_url, doc.id);
            let payload = json!({
                "data": {
                    "count": doc.count + 1,
                    "movie_id": movie.id,
                    "poster_url": poster_url,
                    "title": movie.title,
                }
            });
            send(self.client.patch(&url).json(&payload)).await?;
            debug!("Incremented tally for '{}' to {}", term, doc.count + 1);
        } else {
            let payload = json!({
                "documentId": "unique()",
                "data": {
                    "searchTerm": term,
                    "count": 1,
                    "movie_id": movie.id,
                    "poster_url": poster_url,
                    "title": movie.title,
                }
            });
            send(self.client.post(&self.documents_url).json(&payload)).await?;
            info!("Created tally for '{}'", term);
        }
        Ok(())
    }

    async fn top_hits(&self, limit: usize) -> Result<Vec<TallyRecord>> {
        let docs = self
            .list(&[
                json!({"method": "orderDesc", "attribute": "count"}),
                json!({"method": "limit", "values": [limit]}),
            ])
            .await?;
        Ok(docs.into_iter().map(TallyRecord::from).collect())
    }
}

async fn send(request: RequestBuilder) -> Result<Value> {
    let response = request.send().await.context("Appwrite request failed")?;
    let status = response.status();
    let text = response.text().await.context("reading Appwrite body failed")?;
    if !status.is_success() {
        return Err(anyhow!("Appwrite returned {}: {}", status, text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).context("Appwrite JSON parse failed")
}
