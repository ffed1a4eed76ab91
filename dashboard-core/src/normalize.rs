//! Mapping from provider payloads to the dashboard model.

use chrono::{DateTime, Utc};

use crate::{
    classify::{aqi_level, categorize},
    error::SourceError,
    model::{
        AirQualityReport, AirQualitySample, Coordinates, CurrentConditions, ForecastPoint,
        ForecastReport, NewsArticle, NewsDigest, Pollutants, UvReading, WeatherReport,
    },
    payload::{AirPayload, Condition, CurrentPayload, ForecastPayload, NewsPayload, RawArticle},
};

pub const FORECAST_POINTS: usize = 8;
pub const NEWS_ARTICLES: usize = 6;

pub fn weather_report(
    at: &Coordinates,
    payload: CurrentPayload,
    uv_index: UvReading,
) -> Result<WeatherReport, SourceError> {
    let condition = first_condition(&payload.weather, "current weather")?;
    let wind = payload.wind.unwrap_or_default();

    Ok(WeatherReport {
        location: at.clone(),
        current: CurrentConditions {
            temperature: payload.main.temp.round() as i64,
            feels_like: payload.main.feels_like.round() as i64,
            humidity: payload.main.humidity,
            pressure: payload.main.pressure,
            visibility: payload.visibility / 1000.0,
            uv_index,
            wind_speed: wind.speed,
            wind_direction: wind.deg,
            cloud_cover: payload.clouds.map(|c| c.all).unwrap_or(0),
            condition: condition.main.clone(),
            description: condition.description.clone(),
            icon: condition.icon.clone(),
        },
    })
}

pub fn forecast_report(
    at: &Coordinates,
    payload: ForecastPayload,
) -> Result<ForecastReport, SourceError> {
    let points = payload
        .list
        .into_iter()
        .take(FORECAST_POINTS)
        .map(|entry| -> Result<ForecastPoint, SourceError> {
            let datetime = DateTime::<Utc>::from_timestamp(entry.dt, 0).ok_or_else(|| {
                SourceError::malformed(format!("forecast entry has invalid timestamp {}", entry.dt))
            })?;
            let condition = first_condition(&entry.weather, "forecast entry")?;

            Ok(ForecastPoint {
                datetime,
                temperature: entry.main.temp.round() as i64,
                humidity: entry.main.humidity,
                wind_speed: entry.wind.map(|w| w.speed).unwrap_or(0.0),
                condition: condition.main.clone(),
                description: condition.description.clone(),
                icon: condition.icon.clone(),
                precipitation_probability: entry.pop * 100.0,
            })
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    Ok(ForecastReport { location: at.name.clone(), points })
}

pub fn air_quality_report(
    at: &Coordinates,
    payload: AirPayload,
) -> Result<AirQualityReport, SourceError> {
    let entry = payload
        .list
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::malformed("air quality response contained no samples"))?;

    let level = aqi_level(entry.main.aqi)?;
    let c = entry.components;

    Ok(AirQualityReport {
        location: at.name.clone(),
        sample: AirQualitySample {
            aqi: level.index,
            level: level.level.to_string(),
            color: level.color.to_string(),
            description: level.description.to_string(),
            components: Pollutants {
                co: c.co,
                no: c.no,
                no2: c.no2,
                o3: c.o3,
                so2: c.so2,
                pm2_5: c.pm2_5,
                pm10: c.pm10,
                nh3: c.nh3,
            },
        },
    })
}

pub fn news_digest(payload: NewsPayload) -> NewsDigest {
    let articles: Vec<NewsArticle> =
        payload.articles.into_iter().filter_map(article).take(NEWS_ARTICLES).collect();

    // Can undercount when the provider total is smaller than what we kept;
    // existing consumers see exactly this number.
    let total_results = (articles.len() as u64).min(payload.total_results);

    NewsDigest { query: payload.query, total_results, articles }
}

fn article(raw: RawArticle) -> Option<NewsArticle> {
    let title = raw.title.filter(|s| !s.is_empty())?;
    let description = raw.description.filter(|s| !s.is_empty())?;
    let url = raw.url.filter(|s| !s.is_empty())?;
    let category = categorize(&format!("{title} {description}"));

    Some(NewsArticle {
        title,
        description,
        url,
        source: raw.source.name.unwrap_or_else(|| "Unknown".to_string()),
        published_at: raw.published_at,
        url_to_image: raw.url_to_image,
        category,
    })
}

fn first_condition<'a>(conditions: &'a [Condition], what: &str) -> Result<&'a Condition, SourceError> {
    conditions
        .first()
        .ok_or_else(|| SourceError::malformed(format!("{what} has no weather condition")))
}
