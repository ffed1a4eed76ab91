//! Capabilities the engine depends on. One trait per upstream concern so each
//! can be replaced independently (HTTP clients in production, fakes in tests).

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    error::SourceError,
    model::Coordinates,
    payload::{AirPayload, CurrentPayload, ForecastPayload, NewsPayload},
};

#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self, name: &str) -> Result<Coordinates, SourceError>;
}

#[async_trait]
pub trait CurrentConditionsFetcher: Send + Sync + Debug {
    async fn current(&self, at: &Coordinates) -> Result<CurrentPayload, SourceError>;

    /// Raw UV index; used as a best-effort enrichment of `current`.
    async fn uv_index(&self, at: &Coordinates) -> Result<f64, SourceError>;
}

#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn forecast(&self, at: &Coordinates) -> Result<ForecastPayload, SourceError>;
}

#[async_trait]
pub trait AirQualityFetcher: Send + Sync + Debug {
    async fn air_quality(&self, at: &Coordinates) -> Result<AirPayload, SourceError>;
}

#[async_trait]
pub trait NewsFetcher: Send + Sync + Debug {
    /// `query` is the raw text the user asked about, not a resolved place.
    async fn news(&self, query: &str) -> Result<NewsPayload, SourceError>;
}

/// The full set of collaborators handed to [`crate::Engine`].
#[derive(Debug, Clone)]
pub struct Sources {
    pub resolver: Arc<dyn LocationResolver>,
    pub current: Arc<dyn CurrentConditionsFetcher>,
    pub forecast: Arc<dyn ForecastFetcher>,
    pub air_quality: Arc<dyn AirQualityFetcher>,
    pub news: Arc<dyn NewsFetcher>,
}
