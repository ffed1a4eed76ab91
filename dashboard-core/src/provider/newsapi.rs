use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{error::SourceError, payload::NewsPayload, source::NewsFetcher};

use super::get_json;

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

const WEATHER_TERMS: [&str; 11] = [
    "weather",
    "climate",
    "storm",
    "hurricane",
    "tornado",
    "flood",
    "drought",
    "heatwave",
    "blizzard",
    "rainfall",
    "temperature",
];

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    api_key: String,
    http: Client,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: Client::new() }
    }
}

/// Search expression for weather news about `city`.
///
/// An empty query or the literal "weather" asks for general weather news.
pub fn build_search_query(city: &str) -> String {
    let city = city.trim();
    if city.is_empty() || city == "weather" {
        return WEATHER_TERMS[..5].join(" OR ");
    }

    format!("(\"{city}\" AND ({}))", WEATHER_TERMS.join(" OR "))
}

#[async_trait]
impl NewsFetcher for NewsApiClient {
    async fn news(&self, query: &str) -> Result<NewsPayload, SourceError> {
        let search = build_search_query(query);
        debug!(search = %search, "NewsAPI request");

        let request = self.http.get(EVERYTHING_URL).query(&[
            ("q", search.as_str()),
            ("sortBy", "publishedAt"),
            ("language", "en"),
            ("pageSize", "10"),
            ("apiKey", self.api_key.as_str()),
        ]);

        let mut payload: NewsPayload = get_json(request, "News API").await?;
        payload.query = search;
        Ok(payload)
    }
}
