//! Movies panel backed by the OMDb search API.

use std::time::Duration;

use dtk_core::{FetchError, Fetcher, Query};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::http::HttpClient;
use crate::item::PanelItem;
use crate::simulated::Simulation;

/// OMDb API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

/// Public demo key for the OMDb API.
pub const DEFAULT_API_KEY: &str = "3e974fca";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    /// IMDb identifier, e.g. `tt0372784`.
    pub id: String,
    pub title: String,
    pub year: String,
    pub kind: String,
    pub poster: Option<String>,
    /// Display rating out of five.
    pub rating: f32,
}

impl PanelItem for Movie {
    fn headers() -> &'static [&'static str] {
        &["Title", "Year", "IMDb", "Rating"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.year.clone(),
            self.id.clone(),
            format!("{:.1}", self.rating),
        ]
    }
}

/// Raw OMDb search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchResponse {
    response: String,
    #[serde(default)]
    search: Vec<SearchHit>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchHit {
    title: String,
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    kind: String,
    poster: Option<String>,
}

/// Turn a raw response into hits, or an error for a rejected request.
///
/// OMDb reports "no match" as `Response: "False"` with a "not found" error,
/// which is a normal empty result here.
pub(crate) fn hits_from_response(response: SearchResponse) -> Result<Vec<SearchHitView>, FetchError> {
    if response.response.eq_ignore_ascii_case("true") {
        return Ok(response.search.into_iter().map(SearchHitView).collect());
    }

    let error = response.error.unwrap_or_default();
    if error.to_ascii_lowercase().contains("not found") {
        Ok(Vec::new())
    } else if error.is_empty() {
        Err(FetchError::Api("OMDb rejected the request".to_string()))
    } else {
        Err(FetchError::Api(error))
    }
}

/// A search hit awaiting its display rating.
#[derive(Debug)]
pub(crate) struct SearchHitView(SearchHit);

impl SearchHitView {
    pub(crate) fn into_movie(self, rating: f32) -> Movie {
        let hit = self.0;
        Movie {
            id: hit.imdb_id,
            title: hit.title,
            year: hit.year,
            kind: hit.kind,
            poster: hit.poster.filter(|poster| poster != "N/A"),
            rating,
        }
    }
}

/// Display rating in [3.0, 5.0), rounded to one decimal.
fn display_rating(rng: &mut impl Rng) -> f32 {
    let raw = (rng.random::<f32>() * 4.0 + 6.0) / 2.0;
    ((raw * 10.0).floor() / 10.0).min(4.9)
}

/// Fetcher for the movies panel.
#[derive(Debug)]
pub struct OmdbFetcher {
    client: HttpClient,
    base_url: String,
    api_key: String,
    ratings: Simulation,
}

impl OmdbFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            ratings: Simulation::new(Duration::ZERO, None),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Seed the display ratings.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.ratings = Simulation::new(Duration::ZERO, seed);
        self
    }
}

impl Fetcher for OmdbFetcher {
    type Item = Movie;

    async fn search(&self, query: &Query) -> Result<Vec<Movie>, FetchError> {
        let url = HttpClient::url(
            &self.base_url,
            "",
            &[
                ("apikey", self.api_key.as_str()),
                ("s", query.as_str()),
                ("type", "movie"),
            ],
        )?;
        let response: SearchResponse = self.client.get_json(url).await?;
        let hits = hits_from_response(response)?;

        Ok(self.ratings.with_rng(|rng| {
            hits.into_iter()
                .map(|hit| hit.into_movie(display_rating(&mut *rng)))
                .collect()
        }))
    }
}
