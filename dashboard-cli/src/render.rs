//! Text view of a dashboard.

use std::fmt;

use chrono::{DateTime, Utc};
use dashboard_core::{AirQualityReport, DashboardResult, ForecastReport, NewsDigest, WeatherReport};

pub fn dashboard(result: &DashboardResult, now: DateTime<Utc>) -> String {
    DashboardView { result, now }.to_string()
}

struct DashboardView<'a> {
    result: &'a DashboardResult,
    now: DateTime<Utc>,
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        writeln!(f, "Dashboard for {} ({})", r.city(), r.timestamp().format("%Y-%m-%d %H:%M UTC"))?;

        if let Some(weather) = r.weather() {
            write_weather(f, weather)?;
        }
        if let Some(air) = r.air_quality() {
            write_air_quality(f, air)?;
        }
        if let Some(forecast) = r.forecast() {
            write_forecast(f, forecast)?;
        }
        if let Some(news) = r.news() {
            write_news(f, news, self.now)?;
        }

        if !r.errors().is_empty() {
            writeln!(f)?;
            writeln!(f, "Warning: some data could not be loaded")?;
            for error in r.errors() {
                writeln!(f, "  - {error}")?;
            }
        }

        Ok(())
    }
}

fn write_weather(f: &mut fmt::Formatter<'_>, report: &WeatherReport) -> fmt::Result {
    let loc = &report.location;
    let c = &report.current;

    writeln!(f)?;
    writeln!(f, "Current weather: {}, {}", loc.name, loc.country)?;
    writeln!(f, "  {}°C (feels like {}°C), {}", c.temperature, c.feels_like, c.description)?;
    writeln!(f, "  Humidity {}%  Pressure {} hPa  Visibility {:.1} km", c.humidity, c.pressure, c.visibility)?;
    writeln!(f, "  Wind {:.1} m/s at {:.0}°  Clouds {}%", c.wind_speed, c.wind_direction, c.cloud_cover)?;
    writeln!(f, "  UV index {} ({})", c.uv_index.value, c.uv_index.severity)
}

fn write_air_quality(f: &mut fmt::Formatter<'_>, report: &AirQualityReport) -> fmt::Result {
    let s = &report.sample;
    let p = &s.components;

    writeln!(f)?;
    writeln!(f, "Air quality: {} (AQI {}) - {}", s.level, s.aqi, s.description)?;
    writeln!(
        f,
        "  PM2.5 {:.1}  PM10 {:.1}  O3 {:.1}  NO2 {:.1}  SO2 {:.1}  CO {:.1} µg/m³",
        p.pm2_5, p.pm10, p.o3, p.no2, p.so2, p.co
    )
}

fn write_forecast(f: &mut fmt::Formatter<'_>, report: &ForecastReport) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "Forecast:")?;
    for point in &report.points {
        writeln!(
            f,
            "  {}  {:>3}°C  {:>3.0}% rain  {}",
            point.datetime.format("%a %H:%M"),
            point.temperature,
            point.precipitation_probability,
            point.description
        )?;
    }
    Ok(())
}

fn write_news(f: &mut fmt::Formatter<'_>, digest: &NewsDigest, now: DateTime<Utc>) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "News ({} results):", digest.total_results)?;
    for article in &digest.articles {
        writeln!(f, "  [{}] {}", article.category, article.title)?;
        writeln!(f, "      {} - {}", article.source, time_ago(&article.published_at, now))?;
        writeln!(f, "      {}", article.url)?;
    }
    Ok(())
}

/// Relative age of an RFC 3339 timestamp. Unparseable input is returned as-is.
pub fn time_ago(published: &str, now: DateTime<Utc>) -> String {
    let Ok(at) = DateTime::parse_from_rfc3339(published) else {
        return published.to_string();
    };

    let secs = (now - at.with_timezone(&Utc)).num_seconds();
    match secs {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{} minutes ago", s / 60),
        s if s < 86_400 => format!("{} hours ago", s / 3_600),
        s => format!("{} days ago", s / 86_400),
    }
}
