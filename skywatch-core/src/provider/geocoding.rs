use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    model::Location,
    provider::{Geocoder, get_json},
};

const ENDPOINT: &str = "geocoding";

/// Open-Meteo geocoding search, constrained to the first match.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    // Absent entirely when nothing matches.
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    #[serde(default)]
    country: String,
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, name: &str) -> Result<Location> {
        let query = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        let parsed: GeoResponse =
            get_json(&self.http, ENDPOINT, &self.url, &query).await.map_err(Error::Network)?;

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound { query: name.to_string() })?;

        tracing::info!(
            name = %first.name,
            country = %first.country,
            latitude = first.latitude,
            longitude = first.longitude,
            "resolved location"
        );

        Ok(Location {
            name: first.name,
            country: first.country,
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }
}
