use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Error, RequestError, Result},
    model::{AirQuality, DailyForecast, WeatherSnapshot},
    provider::{WeatherSource, get_json},
};

const FORECAST: &str = "forecast";
const AIR_QUALITY: &str = "air-quality";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,surface_pressure";
const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,sunrise,sunset";
const AIR_QUALITY_FIELDS: &str = "pm10,pm2_5,nitrogen_dioxide,us_aqi";

/// Open-Meteo forecast + air-quality, fetched concurrently and merged.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    http: Client,
    forecast_url: String,
    air_quality_url: String,
}

impl OpenMeteoWeather {
    pub fn new(http: Client, forecast_url: String, air_quality_url: String) -> Self {
        Self { http, forecast_url, air_quality_url }
    }

    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> std::result::Result<ForecastResponse, RequestError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        get_json(&self.http, FORECAST, &self.forecast_url, &query).await
    }

    async fn fetch_air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> std::result::Result<AirQualityResponse, RequestError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", AIR_QUALITY_FIELDS.to_string()),
        ];
        get_json(&self.http, AIR_QUALITY, &self.air_quality_url, &query).await
    }
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    surface_pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastDaily {
    time: Vec<NaiveDate>,
    weathercode: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: ForecastCurrent,
    daily: ForecastDaily,
}

#[derive(Debug, Deserialize)]
struct AirQualityCurrent {
    pm10: f64,
    pm2_5: f64,
    nitrogen_dioxide: f64,
    us_aqi: f64,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: AirQualityCurrent,
}

#[async_trait]
impl WeatherSource for OpenMeteoWeather {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        let (forecast, air) = tokio::try_join!(
            self.fetch_forecast(latitude, longitude),
            self.fetch_air_quality(latitude, longitude),
        )
        .map_err(Error::Fetch)?;

        let snapshot = merge(latitude, longitude, forecast, air).map_err(Error::Fetch)?;
        tracing::info!(latitude, longitude, days = snapshot.daily_forecast.len(), "fetched weather");
        Ok(snapshot)
    }
}

fn merge(
    latitude: f64,
    longitude: f64,
    forecast: ForecastResponse,
    air: AirQualityResponse,
) -> std::result::Result<WeatherSnapshot, RequestError> {
    let decode = |message: String| RequestError::Decode { endpoint: FORECAST, message };

    let ForecastResponse { current, daily } = forecast;

    let sunrise = daily
        .sunrise
        .first()
        .ok_or_else(|| decode("daily block has no sunrise".to_string()))
        .and_then(|s| parse_local_time(s).map_err(decode))?;
    let sunset = daily
        .sunset
        .first()
        .ok_or_else(|| decode("daily block has no sunset".to_string()))
        .and_then(|s| parse_local_time(s).map_err(decode))?;

    let daily_forecast = DailyForecast::new(
        daily.time,
        daily.temperature_2m_max,
        daily.temperature_2m_min,
        daily.weathercode,
    )
    .map_err(decode)?;

    Ok(WeatherSnapshot {
        temperature: current.temperature_2m,
        wind_speed: current.wind_speed_10m,
        humidity: current.relative_humidity_2m,
        pressure: current.surface_pressure,
        sunrise,
        sunset,
        latitude,
        longitude,
        daily_forecast,
        air_quality: AirQuality {
            pm2_5: air.current.pm2_5,
            pm10: air.current.pm10,
            nitrogen_dioxide: air.current.nitrogen_dioxide,
            us_aqi: air.current.us_aqi,
        },
    })
}

/// Local ISO-8601 without offset, with or without seconds.
fn parse_local_time(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("invalid local time '{value}': {e}"))
}
