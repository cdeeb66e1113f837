//! The movie details page: a view model derived from a [`DetailsBundle`].
use serde::Serialize;
use tracing::{error, warn};

use crate::models::{image_url, DetailsBundle};
use crate::tmdb::{parse_movie_id, TmdbApi};
use crate::utils::{
    format_money, format_rating, format_runtime, join_or_placeholder, release_year, PLACEHOLDER,
};

pub const DETAILS_ERROR: &str = "Failed to fetch movie details";
pub const NO_SELECTION_MESSAGE: &str = "No movie selected.";
pub const CAST_LIMIT: usize = 10;
pub const SIMILAR_LIMIT: usize = 12;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailsState {
    NoSelection,
    Failed { message: String },
    Loaded { page: Box<DetailsPage> },
}

impl DetailsState {
    /// Loads the page for the raw `id` query parameter. No request is made
    /// when the id is absent or not a positive integer.
    pub async fn load(tmdb: &dyn TmdbApi, raw_id: Option<&str>) -> Self {
        let Some(raw_id) = raw_id.filter(|s| !s.trim().is_empty()) else {
            return DetailsState::NoSelection;
        };
        let Some(id) = parse_movie_id(raw_id) else {
            warn!("Rejecting movie id {:?}", raw_id);
            return DetailsState::failed();
        };
        match tmdb.fetch_details(id).await {
            Ok(bundle) => DetailsState::Loaded {
                page: Box::new(DetailsPage::from_bundle(&bundle)),
            },
            Err(e) => {
                error!("Error fetching movie details: {:#}", e);
                DetailsState::failed()
            }
        }
    }

    fn failed() -> Self {
        DetailsState::Failed {
            message: DETAILS_ERROR.to_string(),
        }
    }

    pub fn page_mut(&mut self) -> Option<&mut DetailsPage> {
        match self {
            DetailsState::Loaded { page } => Some(page.as_mut()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailsPage {
    pub id: i64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub backdrop_url: Option<String>,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    pub runtime: String,
    pub genres: Vec<String>,
    pub rating: String,
    pub vote_count: u64,
    pub facts: Facts,
    pub cast: Vec<CastCard>,
    pub similar: Vec<SimilarCard>,
    pub trailer: TrailerToggle,
}

/// The metadata grid under the hero banner.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Facts {
    pub status: String,
    pub release_date: String,
    pub runtime: String,
    pub languages: String,
    pub countries: String,
    pub popularity: String,
    pub budget: String,
    pub revenue: String,
    pub production: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CastCard {
    pub name: String,
    pub character: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarCard {
    pub id: i64,
    pub title: String,
    pub poster_url: Option<String>,
}

/// Show/hide flag for the trailer overlay. Opening does nothing when the
/// title has no trailer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrailerToggle {
    embed_url: Option<String>,
    showing: bool,
}

impl TrailerToggle {
    pub fn new(embed_url: Option<String>) -> Self {
        Self {
            embed_url,
            showing: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.embed_url.is_some()
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn open(&mut self) {
        self.showing = self.is_available();
    }

    pub fn close(&mut self) {
        self.showing = false;
    }

    pub fn toggle(&mut self) {
        if self.showing {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn embed_url(&self) -> Option<&str> {
        self.embed_url.as_deref()
    }

    /// Player URL while the overlay is shown.
    pub fn overlay_url(&self) -> Option<&str> {
        if self.showing {
            self.embed_url()
        } else {
            None
        }
    }
}

impl DetailsPage {
    pub fn from_bundle(bundle: &DetailsBundle) -> Self {
        let movie = &bundle.movie;
        let runtime = format_runtime(movie.runtime);

        let facts = Facts {
            status: or_placeholder(movie.status.as_deref()),
            release_date: or_placeholder(movie.release_date.as_deref()),
            runtime: runtime.clone(),
            languages: join_or_placeholder(
                movie.spoken_languages.iter().map(|l| l.english_name.as_str()),
            ),
            countries: join_or_placeholder(
                movie.production_countries.iter().map(|c| c.name.as_str()),
            ),
            popularity: movie
                .popularity
                .map(|p| p.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            budget: format_money(movie.budget),
            revenue: format_money(movie.revenue),
            production: join_or_placeholder(
                movie.production_companies.iter().map(|c| c.name.as_str()),
            ),
        };

        let cast = bundle
            .credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|c| CastCard {
                name: c.name.clone(),
                character: c.character.clone().filter(|s| !s.is_empty()),
                profile_url: image_url(c.profile_path.as_deref(), "w185"),
            })
            .collect();

        let similar = bundle
            .similar
            .iter()
            .take(SIMILAR_LIMIT)
            .map(|m| SimilarCard {
                id: m.id,
                title: m.title.clone(),
                poster_url: image_url(m.poster_path.as_deref(), "w185"),
            })
            .collect();

        DetailsPage {
            id: movie.id,
            title: movie.title.clone(),
            tagline: movie.tagline.clone().filter(|s| !s.is_empty()),
            overview: movie.overview.clone().filter(|s| !s.is_empty()),
            backdrop_url: image_url(movie.backdrop_path.as_deref(), "original"),
            poster_url: image_url(movie.poster_path.as_deref(), "w342"),
            year: release_year(movie.release_date.as_deref()),
            runtime,
            genres: movie.genres.iter().map(|g| g.name.clone()).collect(),
            rating: format_rating(movie.vote_average, PLACEHOLDER),
            vote_count: movie.vote_count.unwrap_or(0),
            facts,
            cast,
            similar,
            trailer: TrailerToggle::new(bundle.trailer().map(|v| v.embed_url())),
        }
    }

    /// Caption for the bottom bar, e.g. `Inception (2010)`.
    pub fn caption(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}
