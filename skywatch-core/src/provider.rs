use crate::{
    Config, Location, WeatherSnapshot,
    error::{RequestError, Result},
    provider::{forecast::OpenMeteoWeather, geocoding::OpenMeteoGeocoder},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub mod forecast;
pub mod geocoding;

/// Resolves free-text place names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// `name` must already be trimmed and non-empty.
    async fn resolve(&self, name: &str) -> Result<Location>;
}

/// Fetches a complete weather and air-quality snapshot for coordinates.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot>;
}

/// Build the shared HTTP client from config.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

/// Construct both Open-Meteo clients over one connection pool.
pub fn open_meteo_from_config(
    config: &Config,
) -> anyhow::Result<(OpenMeteoGeocoder, OpenMeteoWeather)> {
    let http = http_client(config)?;
    let endpoints = &config.endpoints;

    Ok((
        OpenMeteoGeocoder::new(http.clone(), endpoints.geocoding.clone()),
        OpenMeteoWeather::new(http, endpoints.forecast.clone(), endpoints.air_quality.clone()),
    ))
}

/// GET `url` with `query` and decode a JSON body, rejecting non-success
/// statuses.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    endpoint: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> std::result::Result<T, RequestError> {
    tracing::debug!(endpoint, url, "sending request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| RequestError::Transport { endpoint, source })?;

    let status = res.status();
    let body = res.text().await.map_err(|source| RequestError::Transport { endpoint, source })?;

    if !status.is_success() {
        tracing::warn!(endpoint, %status, "request failed");
        return Err(RequestError::Status { endpoint, status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body)
        .map_err(|e| RequestError::Decode { endpoint, message: e.to_string() })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
