use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use dashboard_core::{
    Coordinates, Engine, SourceError, SourceName, Sources, Timeouts, UvEnrichment, UvSeverity,
    payload::{AirPayload, CurrentPayload, ForecastPayload, NewsPayload},
    source::{
        AirQualityFetcher, CurrentConditionsFetcher, ForecastFetcher, LocationResolver,
        NewsFetcher,
    },
};
use serde_json::json;
use tokio::time::{Instant, sleep};

#[derive(Debug, Clone)]
struct Scripted<T> {
    delay: Duration,
    result: Result<T, SourceError>,
}

impl<T: Clone> Scripted<T> {
    fn ok(value: T) -> Self {
        Self { delay: Duration::ZERO, result: Ok(value) }
    }

    fn err(err: SourceError) -> Self {
        Self { delay: Duration::ZERO, result: Err(err) }
    }

    fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn run(&self) -> Result<T, SourceError> {
        sleep(self.delay).await;
        self.result.clone()
    }
}

#[derive(Debug, Clone)]
struct FakeWorld {
    resolve: Scripted<Coordinates>,
    current: Scripted<CurrentPayload>,
    uv: Scripted<f64>,
    forecast: Scripted<ForecastPayload>,
    air: Scripted<AirPayload>,
    news: Scripted<NewsPayload>,
    news_queries: Arc<Mutex<Vec<String>>>,
}

impl FakeWorld {
    fn healthy() -> Self {
        Self {
            resolve: Scripted::ok(kigali()),
            current: Scripted::ok(current_payload()),
            uv: Scripted::ok(9.2),
            forecast: Scripted::ok(forecast_payload()),
            air: Scripted::ok(air_payload(2)),
            news: Scripted::ok(news_payload()),
            news_queries: Arc::default(),
        }
    }

    fn engine(self) -> Engine {
        let world = Arc::new(self);
        let sources = Sources {
            resolver: world.clone(),
            current: world.clone(),
            forecast: world.clone(),
            air_quality: world.clone(),
            news: world,
        };
        Engine::new(sources, Timeouts::default())
    }
}

#[async_trait]
impl LocationResolver for FakeWorld {
    async fn resolve(&self, _name: &str) -> Result<Coordinates, SourceError> {
        self.resolve.run().await
    }
}

#[async_trait]
impl CurrentConditionsFetcher for FakeWorld {
    async fn current(&self, _at: &Coordinates) -> Result<CurrentPayload, SourceError> {
        self.current.run().await
    }

    async fn uv_index(&self, _at: &Coordinates) -> Result<f64, SourceError> {
        self.uv.run().await
    }
}

#[async_trait]
impl ForecastFetcher for FakeWorld {
    async fn forecast(&self, _at: &Coordinates) -> Result<ForecastPayload, SourceError> {
        self.forecast.run().await
    }
}

#[async_trait]
impl AirQualityFetcher for FakeWorld {
    async fn air_quality(&self, _at: &Coordinates) -> Result<AirPayload, SourceError> {
        self.air.run().await
    }
}

#[async_trait]
impl NewsFetcher for FakeWorld {
    async fn news(&self, query: &str) -> Result<NewsPayload, SourceError> {
        self.news_queries.lock().unwrap().push(query.to_string());
        self.news.run().await
    }
}

fn kigali() -> Coordinates {
    Coordinates { latitude: -1.9441, longitude: 30.0619, name: "Kigali".into(), country: "RW".into() }
}

fn current_payload() -> CurrentPayload {
    serde_json::from_value(json!({
        "main": {"temp": 24.4, "feels_like": 24.9, "humidity": 58, "pressure": 1016},
        "visibility": 10000,
        "wind": {"speed": 3.1, "deg": 120},
        "clouds": {"all": 20},
        "weather": [{"main": "Clouds", "description": "few clouds", "icon": "02d"}]
    }))
    .unwrap()
}

fn forecast_payload() -> ForecastPayload {
    let list: Vec<_> = (0..10)
        .map(|i| {
            json!({
                "dt": 1_717_200_000 + i * 10_800,
                "main": {"temp": 20.0 + i as f64, "humidity": 60},
                "wind": {"speed": 2.0},
                "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}],
                "pop": 0.4
            })
        })
        .collect();
    serde_json::from_value(json!({ "list": list })).unwrap()
}

fn air_payload(aqi: i64) -> AirPayload {
    serde_json::from_value(json!({
        "list": [{
            "main": {"aqi": aqi},
            "components": {"co": 230.3, "no": 0.1, "no2": 4.2, "o3": 61.0,
                           "so2": 1.3, "pm2_5": 8.4, "pm10": 12.9, "nh3": 2.0}
        }]
    }))
    .unwrap()
}

fn news_payload() -> NewsPayload {
    let mut payload: NewsPayload = serde_json::from_value(json!({
        "status": "ok",
        "totalResults": 37,
        "articles": [
            {"source": {"name": "Reuters"}, "title": "Flood warnings across the region",
             "description": "Rising emissions blamed", "url": "https://example.com/1",
             "urlToImage": null, "publishedAt": "2024-06-01T08:00:00Z"},
            {"source": {"name": "AP"}, "title": "Coffee harvest", "description": "Farmers look ahead",
             "url": "https://example.com/2", "urlToImage": "https://example.com/2.jpg",
             "publishedAt": "2024-06-01T07:00:00Z"}
        ]
    }))
    .unwrap();
    payload.query = "(\"Kigali\" AND (weather))".into();
    payload
}

fn down() -> SourceError {
    SourceError::unknown("upstream unavailable")
}

#[tokio::test]
async fn all_sources_succeed() {
    let result = FakeWorld::healthy().engine().aggregate("Kigali").await;

    assert!(result.errors().is_empty());
    assert!(result.is_complete());

    let weather = result.weather().expect("weather slot");
    assert_eq!(weather.current.temperature, 24);
    assert_eq!(weather.current.uv_index.value, 9);
    assert_eq!(weather.current.uv_index.severity, UvSeverity::VeryHigh);

    assert_eq!(result.forecast().expect("forecast slot").points.len(), 8);
    assert_eq!(result.air_quality().expect("air slot").sample.level, "Fair");

    let news = result.news().expect("news slot");
    assert_eq!(news.total_results, 2);
    assert_eq!(news.articles[0].category.as_str(), "severe");
    assert_eq!(news.articles[1].category.as_str(), "agriculture");

    let json = serde_json::to_value(&result).unwrap();
    for key in ["city", "timestamp", "weather", "forecast", "airQuality", "news", "errors"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["errors"], json!([]));
}

#[tokio::test]
async fn slot_absent_iff_error_present_for_every_failure_combination() {
    for mask in 0u8..16 {
        let mut world = FakeWorld::healthy();
        if mask & 0b0001 != 0 {
            world.current = Scripted::err(down());
        }
        if mask & 0b0010 != 0 {
            world.forecast = Scripted::err(down());
        }
        if mask & 0b0100 != 0 {
            world.air = Scripted::err(down());
        }
        if mask & 0b1000 != 0 {
            world.news = Scripted::err(down());
        }

        let result = world.engine().aggregate("Kigali").await;

        for (bit, source) in SourceName::all().iter().enumerate() {
            let failed = mask & (1 << bit) != 0;
            let prefix = format!("{source}:");
            let has_error = result.errors().iter().any(|e| e.starts_with(&prefix));

            assert_eq!(!result.is_present(*source), has_error, "mask {mask:04b} source {source}");
            assert_eq!(failed, has_error, "mask {mask:04b} source {source}");
        }
        assert_eq!(result.errors().len(), mask.count_ones() as usize);
    }
}

#[tokio::test(start_paused = true)]
async fn kigali_with_air_quality_timeout() {
    let mut world = FakeWorld::healthy();
    world.air = Scripted::ok(air_payload(3)).after(Duration::from_secs(11));

    let result = world.engine().aggregate("Kigali").await;

    assert!(result.weather().is_some());
    assert!(result.forecast().is_some());
    assert!(result.news().is_some());
    assert!(result.air_quality().is_none());
    assert_eq!(result.errors(), ["airQuality: air quality request timed out after 10s"]);

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["airQuality"].is_null());
}

#[tokio::test(start_paused = true)]
async fn uv_timeout_falls_back_without_error() {
    let mut world = FakeWorld::healthy();
    world.uv = Scripted::ok(11.0).after(Duration::from_secs(6));

    let result = world.engine().aggregate("Kigali").await;

    let uv = result.weather().expect("weather slot").current.uv_index;
    assert_eq!(uv.value, UvEnrichment::DEFAULT_VALUE);
    assert_eq!(uv.severity, UvSeverity::Moderate);
    assert!(result.errors().is_empty());
}

#[tokio::test]
async fn uv_failure_falls_back_without_error() {
    let mut world = FakeWorld::healthy();
    world.uv = Scripted::err(SourceError::unauthorized("Invalid API key"));

    let result = world.engine().aggregate("Kigali").await;

    let uv = result.weather().expect("weather slot").current.uv_index;
    assert_eq!(uv.value, 5);
    assert_eq!(uv.severity, UvSeverity::Moderate);
    assert!(result.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn latency_is_bounded_by_slowest_branch() {
    let mut world = FakeWorld::healthy();
    world.current = Scripted::ok(current_payload()).after(Duration::from_secs(1));
    world.forecast = Scripted::ok(forecast_payload()).after(Duration::from_secs(2));
    world.air = Scripted::ok(air_payload(1)).after(Duration::from_secs(3));
    world.news = Scripted::ok(news_payload()).after(Duration::from_secs(4));

    let engine = world.engine();
    let started = Instant::now();
    let result = engine.aggregate("Kigali").await;
    let elapsed = started.elapsed();

    assert!(result.errors().is_empty());
    assert!(elapsed >= Duration::from_secs(4));
    assert!(elapsed < Duration::from_millis(4_100), "took {elapsed:?}, expected ~4s not 10s");
}

#[tokio::test(start_paused = true)]
async fn error_order_is_fixed_by_source_not_completion() {
    let mut world = FakeWorld::healthy();
    world.current = Scripted::err(SourceError::unknown("w")).after(Duration::from_secs(4));
    world.forecast = Scripted::err(SourceError::unknown("f")).after(Duration::from_secs(3));
    world.air = Scripted::err(SourceError::unknown("a")).after(Duration::from_secs(2));
    world.news = Scripted::err(SourceError::unknown("n")).after(Duration::from_secs(1));

    let result = world.engine().aggregate("Kigali").await;

    assert_eq!(result.errors(), ["weather: w", "forecast: f", "airQuality: a", "news: n"]);
}

#[tokio::test]
async fn failed_lookup_is_recorded_per_coordinate_source() {
    let mut world = FakeWorld::healthy();
    world.resolve = Scripted::err(SourceError::not_found("City \"Atlantis\" not found"));
    let queries = world.news_queries.clone();

    let result = world.engine().aggregate("Atlantis").await;

    let expected = "Failed to get coordinates for Atlantis: City \"Atlantis\" not found";
    assert_eq!(
        result.errors(),
        [
            format!("weather: {expected}"),
            format!("forecast: {expected}"),
            format!("airQuality: {expected}"),
        ]
    );
    assert!(result.weather().is_none());
    assert!(result.forecast().is_none());
    assert!(result.air_quality().is_none());
    assert!(result.news().is_some());
    assert_eq!(*queries.lock().unwrap(), ["Atlantis"]);
    assert_eq!(result.city(), "Atlantis");
}

#[tokio::test(start_paused = true)]
async fn slow_lookup_times_out_like_any_other_failure() {
    let mut world = FakeWorld::healthy();
    world.resolve = Scripted::ok(kigali()).after(Duration::from_secs(30));

    let result = world.engine().aggregate("Kigali").await;

    assert_eq!(result.errors().len(), 3);
    assert!(result.errors()[0].starts_with("weather: Failed to get coordinates for Kigali: location lookup timed out"));
    assert!(result.news().is_some());
}

#[tokio::test]
async fn aqi_outside_range_fails_only_air_quality() {
    let mut world = FakeWorld::healthy();
    world.air = Scripted::ok(air_payload(7));

    let result = world.engine().aggregate("Kigali").await;

    assert!(result.air_quality().is_none());
    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].starts_with("airQuality: air quality index 7 is outside"));
    assert!(result.weather().is_some());
}

#[tokio::test]
async fn repeated_aggregation_differs_only_in_timestamp() {
    let engine = FakeWorld::healthy().engine();

    let mut first = serde_json::to_value(engine.aggregate("Kigali").await).unwrap();
    let mut second = serde_json::to_value(engine.aggregate("Kigali").await).unwrap();

    first.as_object_mut().unwrap().remove("timestamp");
    second.as_object_mut().unwrap().remove("timestamp");
    assert_eq!(first, second);
}
