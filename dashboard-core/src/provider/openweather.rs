use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::SourceError,
    model::Coordinates,
    payload::{AirPayload, CurrentPayload, ForecastPayload, GeoEntry, UvPayload},
    source::{AirQualityFetcher, CurrentConditionsFetcher, ForecastFetcher, LocationResolver},
};

use super::get_json;

const DATA_URL: &str = "https://api.openweathermap.org/data/2.5";
const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// OpenWeather client covering geocoding, current conditions, UV index,
/// forecast and air pollution.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn data<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        at: &Coordinates,
        metric: bool,
        context: &str,
    ) -> Result<T, SourceError> {
        let mut query = vec![
            ("lat", at.latitude.to_string()),
            ("lon", at.longitude.to_string()),
            ("appid", self.api_key.clone()),
        ];
        if metric {
            query.push(("units", "metric".to_string()));
        }

        debug!(endpoint, lat = at.latitude, lon = at.longitude, "OpenWeather request");

        let request = self.http.get(format!("{DATA_URL}/{endpoint}")).query(&query);
        get_json(request, context).await
    }
}

#[async_trait]
impl LocationResolver for OpenWeatherClient {
    async fn resolve(&self, name: &str) -> Result<Coordinates, SourceError> {
        let request = self.http.get(format!("{GEO_URL}/direct")).query(&[
            ("q", name),
            ("limit", "1"),
            ("appid", self.api_key.as_str()),
        ]);

        let entries: Vec<GeoEntry> = get_json(request, "OpenWeather geocoding").await?;

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::not_found(format!("City \"{name}\" not found")))?;

        Ok(Coordinates {
            latitude: entry.lat,
            longitude: entry.lon,
            name: entry.name,
            country: entry.country,
        })
    }
}

#[async_trait]
impl CurrentConditionsFetcher for OpenWeatherClient {
    async fn current(&self, at: &Coordinates) -> Result<CurrentPayload, SourceError> {
        self.data("weather", at, true, "OpenWeather current weather").await
    }

    async fn uv_index(&self, at: &Coordinates) -> Result<f64, SourceError> {
        let payload: UvPayload = self.data("uvi", at, false, "OpenWeather UV index").await?;
        Ok(payload.value)
    }
}

#[async_trait]
impl ForecastFetcher for OpenWeatherClient {
    async fn forecast(&self, at: &Coordinates) -> Result<ForecastPayload, SourceError> {
        self.data("forecast", at, true, "OpenWeather forecast").await
    }
}

#[async_trait]
impl AirQualityFetcher for OpenWeatherClient {
    async fn air_quality(&self, at: &Coordinates) -> Result<AirPayload, SourceError> {
        self.data("air_pollution", at, false, "OpenWeather air pollution").await
    }
}
