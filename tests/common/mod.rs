#![allow(dead_code)]

use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use streamvibe::models::{
    CastMember, Credits, DetailsBundle, Genre, MovieDetail, MovieSummary, TallyRecord, Video,
};
use streamvibe::tally::TallyApi;
use streamvibe::tmdb::{CatalogError, TmdbApi};

#[derive(Clone)]
pub enum Reply {
    Movies(Vec<MovieSummary>),
    Reported(String),
    Transport,
}

pub struct FakeTmdb {
    pub discover: Vec<MovieSummary>,
    pub searches: HashMap<String, Reply>,
    pub delays: HashMap<String, Duration>,
    pub details: HashMap<i64, DetailsBundle>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTmdb {
    pub fn new() -> Self {
        Self {
            discover: vec![movie(550, "Fight Club"), movie(680, "Pulp Fiction")],
            searches: HashMap::new(),
            delays: HashMap::new(),
            details: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(mut self, query: &str, reply: Reply) -> Self {
        self.searches.insert(query.to_string(), reply);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn with_details(mut self, bundle: DetailsBundle) -> Self {
        self.details.insert(bundle.movie.id, bundle);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        self.calls.lock().unwrap().push(format!("search:{query}"));
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        match self.searches.get(query).cloned() {
            Some(Reply::Movies(movies)) => Ok(movies),
            Some(Reply::Reported(message)) => Err(CatalogError::Reported(message)),
            Some(Reply::Transport) => Err(CatalogError::Transport(anyhow!("HTTP 500"))),
            None => Ok(Vec::new()),
        }
    }

    async fn discover_movies(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        self.calls.lock().unwrap().push("discover".to_string());
        Ok(self.discover.clone())
    }

    async fn fetch_details(&self, id: i64) -> anyhow::Result<DetailsBundle> {
        self.calls.lock().unwrap().push(format!("details:{id}"));
        self.details
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("/movie/{id} -> 500 Internal Server Error"))
    }
}

#[derive(Default)]
pub struct FakeTally {
    pub top: Vec<TallyRecord>,
    pub fail_record: bool,
    pub fail_top: bool,
    pub hits: Mutex<Vec<(String, MovieSummary)>>,
}

impl FakeTally {
    pub fn hits(&self) -> Vec<(String, MovieSummary)> {
        self.hits.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TallyApi for FakeTally {
    async fn record_hit(&self, query: &str, movie: &MovieSummary) -> anyhow::Result<()> {
        self.hits
            .lock()
            .unwrap()
            .push((query.to_string(), movie.clone()));
        if self.fail_record {
            return Err(anyhow!("Appwrite returned 503"));
        }
        Ok(())
    }

    async fn top_hits(&self, limit: usize) -> anyhow::Result<Vec<TallyRecord>> {
        if self.fail_top {
            return Err(anyhow!("Appwrite returned 401"));
        }
        Ok(self.top.iter().take(limit).cloned().collect())
    }
}

pub fn movie(id: i64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
        vote_average: Some(7.5),
        release_date: Some("2005-06-10".to_string()),
        original_language: "en".to_string(),
        overview: None,
    }
}

pub fn batman_results() -> Vec<MovieSummary> {
    vec![
        movie(272, "Batman Begins"),
        movie(268, "Batman"),
        movie(414906, "The Batman"),
    ]
}

pub fn tally_record(term: &str, count: u64, title: &str) -> TallyRecord {
    TallyRecord {
        id: Some(format!("doc-{term}")),
        search_term: term.to_string(),
        count,
        movie_id: Some(1),
        poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{term}.jpg")),
        title: Some(title.to_string()),
    }
}

pub fn inception_bundle(videos: Vec<Video>, cast: usize, similar: usize) -> DetailsBundle {
    DetailsBundle {
        movie: MovieDetail {
            id: 27205,
            title: "Inception".to_string(),
            tagline: Some("Your mind is the scene of the crime.".to_string()),
            overview: Some("Cobb, a skilled thief.".to_string()),
            status: Some("Released".to_string()),
            poster_path: Some("/inception.jpg".to_string()),
            backdrop_path: Some("/dream.jpg".to_string()),
            release_date: Some("2010-07-15".to_string()),
            original_language: "en".to_string(),
            runtime: Some(148),
            genres: vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }],
            budget: Some(160_000_000),
            revenue: Some(839_030_630),
            spoken_languages: vec![],
            production_countries: vec![],
            production_companies: vec![],
            vote_average: Some(8.4),
            vote_count: Some(36_000),
            popularity: Some(83.9),
        },
        videos,
        credits: Credits {
            cast: (0..cast as i64)
                .map(|i| CastMember {
                    id: i,
                    cast_id: Some(i),
                    name: format!("Actor {i}"),
                    character: Some(format!("Role {i}")),
                    profile_path: None,
                })
                .collect(),
            crew: vec![],
        },
        similar: (0..similar as i64)
            .map(|i| movie(2000 + i, &format!("Similar {i}")))
            .collect(),
    }
}

pub fn youtube_trailer(key: &str) -> Video {
    Video {
        video_type: "Trailer".to_string(),
        site: "YouTube".to_string(),
        key: key.to_string(),
        name: Some("Official Trailer".to_string()),
    }
}
