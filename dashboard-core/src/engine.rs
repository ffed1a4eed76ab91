//! Dashboard aggregation.
//!
//! One call to [`Engine::aggregate`] resolves the city, fans out to the four
//! sources concurrently and waits for all of them. Every failure, including
//! a failed location lookup or a timeout, ends up as a [`SourceOutcome::Failure`];
//! no branch can cancel or fail another.

use std::{future::Future, time::Duration};

use chrono::Utc;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

use crate::{
    config::Timeouts,
    error::SourceError,
    model::{
        AirQualityReport, Coordinates, DashboardResult, ForecastReport, NewsDigest, SourceName,
        SourceOutcome, UvReading, WeatherReport,
    },
    normalize,
    source::Sources,
};

/// Policy for the UV index lookup made while fetching current conditions.
///
/// The lookup is optional enrichment: when it fails or times out the current
/// conditions still succeed, carrying [`UvEnrichment::DEFAULT_VALUE`], and no
/// error is reported for it.
#[derive(Debug, Clone, Copy)]
pub struct UvEnrichment;

impl UvEnrichment {
    pub const DEFAULT_VALUE: u32 = 5;

    pub fn apply(lookup: Result<f64, SourceError>) -> UvReading {
        match lookup {
            Ok(value) if value.is_finite() && value >= 0.0 => UvReading::new(value.round() as u32),
            Ok(value) => {
                debug!(value, "UV index out of range, using default");
                UvReading::new(Self::DEFAULT_VALUE)
            }
            Err(err) => {
                debug!(error = %err, "UV index unavailable, using default");
                UvReading::new(Self::DEFAULT_VALUE)
            }
        }
    }
}

type LocatedOutcomes = (
    SourceOutcome<WeatherReport>,
    SourceOutcome<ForecastReport>,
    SourceOutcome<AirQualityReport>,
);

#[derive(Debug, Clone)]
pub struct Engine {
    sources: Sources,
    timeouts: Timeouts,
}

impl Engine {
    pub fn new(sources: Sources, timeouts: Timeouts) -> Self {
        Self { sources, timeouts }
    }

    /// Build the dashboard for `city`. Never fails; see [`DashboardResult::errors`].
    pub async fn aggregate(&self, city: &str) -> DashboardResult {
        let started = Instant::now();
        debug!(city, "aggregating dashboard");

        // News only needs the raw query, so it does not wait for the lookup.
        let ((weather, forecast, air_quality), news) =
            tokio::join!(self.located(city), self.news(city));

        let result =
            DashboardResult::assemble(city, Utc::now(), weather, forecast, air_quality, news);

        for entry in result.errors() {
            warn!(city, error = %entry, "source failed");
        }
        info!(
            city,
            failed = result.errors().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard aggregated"
        );

        result
    }

    async fn located(&self, city: &str) -> LocatedOutcomes {
        let resolved =
            bounded(self.timeouts.resolve(), "location lookup", self.sources.resolver.resolve(city))
                .await;

        match resolved {
            Ok(at) => {
                debug!(name = %at.name, lat = at.latitude, lon = at.longitude, "location resolved");
                tokio::join!(self.weather(&at), self.forecast(&at), self.air_quality(&at))
            }
            Err(err) => {
                // A failed lookup counts against each source that needs coordinates.
                let message = format!("Failed to get coordinates for {city}: {err}");
                (
                    failed(SourceName::Weather, &message),
                    failed(SourceName::Forecast, &message),
                    failed(SourceName::AirQuality, &message),
                )
            }
        }
    }

    async fn weather(&self, at: &Coordinates) -> SourceOutcome<WeatherReport> {
        SourceOutcome::from_result(SourceName::Weather, self.fetch_weather(at).await)
    }

    async fn fetch_weather(&self, at: &Coordinates) -> Result<WeatherReport, SourceError> {
        let payload = bounded(
            self.timeouts.source(),
            "current weather request",
            self.sources.current.current(at),
        )
        .await?;

        // Dependent on the same coordinates; never fails the parent call.
        let uv = bounded(self.timeouts.uv(), "UV index request", self.sources.current.uv_index(at))
            .await;

        normalize::weather_report(at, payload, UvEnrichment::apply(uv))
    }

    async fn forecast(&self, at: &Coordinates) -> SourceOutcome<ForecastReport> {
        let result =
            bounded(self.timeouts.source(), "forecast request", self.sources.forecast.forecast(at))
                .await
                .and_then(|payload| normalize::forecast_report(at, payload));

        SourceOutcome::from_result(SourceName::Forecast, result)
    }

    async fn air_quality(&self, at: &Coordinates) -> SourceOutcome<AirQualityReport> {
        let result = bounded(
            self.timeouts.source(),
            "air quality request",
            self.sources.air_quality.air_quality(at),
        )
        .await
        .and_then(|payload| normalize::air_quality_report(at, payload));

        SourceOutcome::from_result(SourceName::AirQuality, result)
    }

    async fn news(&self, query: &str) -> SourceOutcome<NewsDigest> {
        let result = bounded(self.timeouts.source(), "news request", self.sources.news.news(query))
            .await
            .map(normalize::news_digest);

        SourceOutcome::from_result(SourceName::News, result)
    }
}

fn failed<T>(source: SourceName, message: &str) -> SourceOutcome<T> {
    SourceOutcome::Failure { source, message: message.to_string() }
}

/// Run `call`, turning an elapsed deadline into a `Timeout` error.
async fn bounded<T, F>(limit: Duration, what: &str, call: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::timeout(format!("{what} timed out after {limit:?}"))),
    }
}
