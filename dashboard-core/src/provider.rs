use crate::{
    Config,
    error::SourceError,
    provider::{newsapi::NewsApiClient, openweather::OpenWeatherClient},
    source::Sources,
};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, sync::Arc};

pub mod newsapi;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    NewsApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::NewsApi => "newsapi",
        }
    }

    /// Environment variable that overrides the stored key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::NewsApi => "NEWS_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::NewsApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "newsapi" | "news" => Ok(ProviderId::NewsApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, newsapi."
            )),
        }
    }
}

fn required_api_key(id: ProviderId, config: &Config) -> anyhow::Result<String> {
    config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `dashboard configure {id}` or set {}.",
            id.env_var()
        )
    })
}

/// Wire the HTTP-backed sources from configured credentials.
pub fn sources_from_config(config: &Config) -> anyhow::Result<Sources> {
    let weather = Arc::new(OpenWeatherClient::new(required_api_key(ProviderId::OpenWeather, config)?));
    let news = Arc::new(NewsApiClient::new(required_api_key(ProviderId::NewsApi, config)?));

    Ok(Sources {
        resolver: weather.clone(),
        current: weather.clone(),
        forecast: weather.clone(),
        air_quality: weather,
        news,
    })
}

/// Send `request` and decode a JSON body, mapping every failure to a [`SourceError`].
///
/// `context` names the call in messages, e.g. "OpenWeather forecast".
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, SourceError> {
    let res = request.send().await.map_err(|e| transport_error(context, e))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| transport_error(context, e))?;

    if !status.is_success() {
        return Err(SourceError::from_status(status.as_u16(), context, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| SourceError::malformed(format!("Failed to parse {context} JSON: {e}")))
}

fn transport_error(context: &str, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::timeout(format!("{context} request timed out"))
    } else {
        SourceError::unknown(format!("Failed to send request to {context}: {err}"))
    }
}
