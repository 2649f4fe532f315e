//! Books panel backed by the Google Books volumes API.

use chrono::NaiveDate;
use dtk_core::{FetchError, Fetcher, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::HttpClient;
use crate::item::PanelItem;

/// Google Books API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Results requested per search.
pub const DEFAULT_MAX_RESULTS: u32 = 12;

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN_DATE: &str = "Unknown Date";
const NO_DESCRIPTION: &str = "No description available";

/// A book as shown in the panel. Missing fields are already defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: String,
    pub description: String,
    pub thumbnail: Option<String>,
}

impl Book {
    /// Publication date as "Month YYYY" when the API gave a full or
    /// year-month date, otherwise the raw value.
    #[must_use]
    pub fn published_label(&self) -> String {
        let raw = self.published_date.as_str();
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"));
        match parsed {
            Ok(date) => date.format("%B %Y").to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

impl PanelItem for Book {
    fn headers() -> &'static [&'static str] {
        &["Title", "Authors", "Published", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.authors.join(", "),
            self.published_label(),
            truncate(&self.description, 80),
        ]
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// Raw response of `GET /volumes`.
#[derive(Debug, Deserialize)]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: Option<String>,
    #[serde(rename = "volumeInfo", default)]
    info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    published_date: Option<String>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<Volume> for Book {
    fn from(volume: Volume) -> Self {
        let info = volume.info;
        let authors = info
            .authors
            .filter(|authors| !authors.is_empty())
            .unwrap_or_else(|| vec![UNKNOWN_AUTHOR.to_string()]);

        Self {
            id: volume.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: info.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors,
            published_date: info
                .published_date
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            description: info
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            thumbnail: info
                .image_links
                .and_then(|links| links.thumbnail)
                .map(|url| url.replacen("http://", "https://", 1)),
        }
    }
}

pub(crate) fn books_from_response(response: VolumesResponse) -> Vec<Book> {
    response.items.into_iter().map(Book::from).collect()
}

/// Fetcher for the books panel.
#[derive(Debug, Clone)]
pub struct GoogleBooksFetcher {
    client: HttpClient,
    base_url: String,
    max_results: u32,
}

impl GoogleBooksFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Fetcher for GoogleBooksFetcher {
    type Item = Book;

    async fn search(&self, query: &Query) -> Result<Vec<Book>, FetchError> {
        let max_results = self.max_results.to_string();
        let url = HttpClient::url(
            &self.base_url,
            "volumes",
            &[("q", query.as_str()), ("maxResults", &max_results)],
        )?;
        let response: VolumesResponse = self.client.get_json(url).await?;
        Ok(books_from_response(response))
    }
}
