use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    classify::{NewsCategory, UvSeverity},
    error::SourceError,
};

/// A resolved place. Produced once per request by the location resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UvReading {
    pub value: u32,
    pub severity: UvSeverity,
}

impl UvReading {
    pub fn new(value: u32) -> Self {
        Self { value, severity: UvSeverity::from_index(value) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    /// km
    pub visibility: f64,
    pub uv_index: UvReading,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub cloud_cover: u8,
    pub condition: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: Coordinates,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub datetime: DateTime<Utc>,
    pub temperature: i64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: String,
    pub description: String,
    pub icon: String,
    /// Percent, 0..=100.
    pub precipitation_probability: f64,
}

/// Chronological, as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub location: String,
    #[serde(rename = "forecast")]
    pub points: Vec<ForecastPoint>,
}

/// Concentrations in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pollutants {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualitySample {
    pub aqi: u8,
    pub level: String,
    pub color: String,
    pub description: String,
    pub components: Pollutants,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    pub location: String,
    #[serde(rename = "airQuality")]
    pub sample: AirQualitySample,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub url_to_image: Option<String>,
    pub category: NewsCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDigest {
    pub query: String,
    pub total_results: u64,
    pub articles: Vec<NewsArticle>,
}

/// Identity of one dashboard slot. Declaration order is the error-list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceName {
    Weather,
    Forecast,
    AirQuality,
    News,
}

impl SourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Weather => "weather",
            SourceName::Forecast => "forecast",
            SourceName::AirQuality => "airQuality",
            SourceName::News => "news",
        }
    }

    pub const fn all() -> &'static [SourceName] {
        &[SourceName::Weather, SourceName::Forecast, SourceName::AirQuality, SourceName::News]
    }
}

impl std::fmt::Display for SourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one fetcher invocation for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Success(T),
    Failure { source: SourceName, message: String },
}

impl<T> SourceOutcome<T> {
    pub fn from_result(source: SourceName, result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => SourceOutcome::Success(value),
            Err(err) => SourceOutcome::Failure { source, message: err.message },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SourceOutcome::Success(_))
    }

    /// Split into the slot value, pushing `"<source>: <message>"` on failure.
    fn into_slot(self, errors: &mut Vec<String>) -> Option<T> {
        match self {
            SourceOutcome::Success(value) => Some(value),
            SourceOutcome::Failure { source, message } => {
                errors.push(format!("{source}: {message}"));
                None
            }
        }
    }
}

/// The aggregate returned for one city query.
///
/// A slot is `None` exactly when `errors` holds an entry for that source;
/// both are derived from the same [`SourceOutcome`] in [`DashboardResult::assemble`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResult {
    city: String,
    timestamp: DateTime<Utc>,
    weather: Option<WeatherReport>,
    forecast: Option<ForecastReport>,
    air_quality: Option<AirQualityReport>,
    news: Option<NewsDigest>,
    errors: Vec<String>,
}

impl DashboardResult {
    pub fn assemble(
        city: impl Into<String>,
        timestamp: DateTime<Utc>,
        weather: SourceOutcome<WeatherReport>,
        forecast: SourceOutcome<ForecastReport>,
        air_quality: SourceOutcome<AirQualityReport>,
        news: SourceOutcome<NewsDigest>,
    ) -> Self {
        let mut errors = Vec::new();

        // Order of these calls fixes the order of `errors`.
        let weather = weather.into_slot(&mut errors);
        let forecast = forecast.into_slot(&mut errors);
        let air_quality = air_quality.into_slot(&mut errors);
        let news = news.into_slot(&mut errors);

        Self {
            city: city.into(),
            timestamp,
            weather,
            forecast,
            air_quality,
            news,
            errors,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn weather(&self) -> Option<&WeatherReport> {
        self.weather.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastReport> {
        self.forecast.as_ref()
    }

    pub fn air_quality(&self) -> Option<&AirQualityReport> {
        self.air_quality.as_ref()
    }

    pub fn news(&self) -> Option<&NewsDigest> {
        self.news.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_present(&self, source: SourceName) -> bool {
        match source {
            SourceName::Weather => self.weather.is_some(),
            SourceName::Forecast => self.forecast.is_some(),
            SourceName::AirQuality => self.air_quality.is_some(),
            SourceName::News => self.news.is_some(),
        }
    }

    pub fn failed_sources(&self) -> Vec<SourceName> {
        SourceName::all().iter().copied().filter(|s| !self.is_present(*s)).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
