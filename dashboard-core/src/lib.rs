//! Core library for the weather intelligence dashboard.
//!
//! This crate defines:
//! - The aggregation engine that fans out to every source and merges the outcomes
//! - Classification of raw provider values (AQI levels, UV buckets, news categories)
//! - Source capabilities and their OpenWeather / NewsAPI implementations
//! - Configuration & credentials handling
//!
//! It is used by `dashboard-cli`, but can also be reused by other binaries or services.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod provider;
pub mod source;

pub use classify::{AqiLevel, NewsCategory, UvSeverity};
pub use config::{Config, ProviderConfig, Timeouts};
pub use engine::{Engine, UvEnrichment};
pub use error::{ClassifyError, SourceError, SourceErrorKind};
pub use model::{
    AirQualityReport, AirQualitySample, Coordinates, CurrentConditions, DashboardResult,
    ForecastPoint, ForecastReport, NewsArticle, NewsDigest, SourceName, SourceOutcome,
    WeatherReport,
};
pub use provider::{ProviderId, sources_from_config};
pub use source::Sources;
