use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::display::{AqiLevel, WeatherCategory};

/// Number of forecast days shown after "today".
pub const FORECAST_DAYS: usize = 5;

/// A geocoded place.
///
/// Identity is the `(latitude, longitude)` pair exactly as returned by the
/// geocoding service, so two records with different names but the same
/// coordinates compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A starred location. Stored exactly like a [`Location`].
pub type FavoriteLocation = Location;

impl Location {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily forecast as index-aligned columns. Index 0 is today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    dates: Vec<NaiveDate>,
    temperature_max: Vec<f64>,
    temperature_min: Vec<f64>,
    weather_codes: Vec<i32>,
}

/// One row of a [`DailyForecast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub weather_code: i32,
}

impl DayForecast {
    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::from_code(self.weather_code)
    }
}

impl DailyForecast {
    /// Builds a forecast, rejecting columns of unequal length.
    pub fn new(
        dates: Vec<NaiveDate>,
        temperature_max: Vec<f64>,
        temperature_min: Vec<f64>,
        weather_codes: Vec<i32>,
    ) -> Result<Self, String> {
        let len = dates.len();
        if temperature_max.len() != len || temperature_min.len() != len || weather_codes.len() != len
        {
            return Err(format!(
                "daily columns are misaligned: {} dates, {} max, {} min, {} codes",
                len,
                temperature_max.len(),
                temperature_min.len(),
                weather_codes.len(),
            ));
        }

        Ok(Self { dates, temperature_max, temperature_min, weather_codes })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = DayForecast> + '_ {
        (0..self.len()).map(|i| DayForecast {
            date: self.dates[i],
            temperature_max: self.temperature_max[i],
            temperature_min: self.temperature_min[i],
            weather_code: self.weather_codes[i],
        })
    }

    /// The displayed forecast: up to [`FORECAST_DAYS`] rows after today.
    pub fn upcoming(&self) -> impl Iterator<Item = DayForecast> + '_ {
        self.days().skip(1).take(FORECAST_DAYS)
    }
}

/// Current pollutant readings, in µg/m³, plus the US AQI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub pm2_5: f64,
    pub pm10: f64,
    pub nitrogen_dioxide: f64,
    pub us_aqi: f64,
}

impl AirQuality {
    pub fn level(&self) -> AqiLevel {
        AqiLevel::from_us_aqi(self.us_aqi)
    }
}

/// A complete weather and air-quality reading for one place.
///
/// Values are in the provider's native metric units: °C, m/s, %, hPa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub daily_forecast: DailyForecast,
    pub air_quality: AirQuality,
}
