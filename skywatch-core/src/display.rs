//! Stateless formatting and classification helpers used by the view.
//!
//! Stored values always stay in the provider's metric units; conversion and
//! rounding happen here, at display time only.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime};

use crate::model::TemperatureUnit;

pub fn convert_temp(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Round half up, never yielding `-0`, so -0.3 shows as "0" and -2.5 as "-2".
fn display_round(value: f64) -> f64 {
    let rounded = (value + 0.5).floor();
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// "18°C" / "64°F".
pub fn format_temp(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}{}", display_round(convert_temp(celsius, unit)), unit.symbol())
}

/// Rounded degrees without the unit letter, as used in forecast rows.
pub fn format_degrees(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}°", display_round(convert_temp(celsius, unit)))
}

pub fn format_humidity(humidity: f64) -> String {
    format!("{}%", display_round(humidity))
}

pub fn format_wind(speed: f64) -> String {
    format!("{} m/s", display_round(speed))
}

pub fn format_pressure(pressure: f64) -> String {
    format!("{} hPa", display_round(pressure))
}

pub fn format_pollutant(value: f64) -> String {
    format!("{value:.1} µg/m³")
}

/// "Tue, Jan 16".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// "7:42 AM".
pub fn format_time(time: NaiveDateTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// "Lat: 48.86° | Lon: 2.35°".
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("Lat: {latitude:.2}° | Lon: {longitude:.2}°")
}

/// Embeddable wind map centred on the coordinates.
pub fn map_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://embed.windy.com/embed2.html?lat={latitude}&lon={longitude}&zoom=8&level=surface\
         &overlay=wind&product=ecmwf&menu=&message=&marker=&calendar=&pressure=&type=map\
         &location=coordinates&detail=&metricWind=default&metricTemp=default&radarRange=-1"
    )
}

/// Display category for WMO weather codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    ClearSky,
    PartlyCloudy,
    Foggy,
    Drizzle,
    Rain,
    Snow,
    SnowGrains,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    ThunderstormWithHail,
    Unknown,
}

impl WeatherCategory {
    pub const ALL: [WeatherCategory; 12] = [
        WeatherCategory::ClearSky,
        WeatherCategory::PartlyCloudy,
        WeatherCategory::Foggy,
        WeatherCategory::Drizzle,
        WeatherCategory::Rain,
        WeatherCategory::Snow,
        WeatherCategory::SnowGrains,
        WeatherCategory::RainShowers,
        WeatherCategory::SnowShowers,
        WeatherCategory::Thunderstorm,
        WeatherCategory::ThunderstormWithHail,
        WeatherCategory::Unknown,
    ];

    /// Codes missing from [`WEATHER_CODES`] map to `Unknown`.
    pub fn from_code(code: i32) -> Self {
        WEATHER_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, category)| *category)
            .unwrap_or(WeatherCategory::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCategory::ClearSky => "Clear sky",
            WeatherCategory::PartlyCloudy => "Partly cloudy",
            WeatherCategory::Foggy => "Foggy",
            WeatherCategory::Drizzle => "Drizzle",
            WeatherCategory::Rain => "Rain",
            WeatherCategory::Snow => "Snow",
            WeatherCategory::SnowGrains => "Snow grains",
            WeatherCategory::RainShowers => "Rain showers",
            WeatherCategory::SnowShowers => "Snow showers",
            WeatherCategory::Thunderstorm => "Thunderstorm",
            WeatherCategory::ThunderstormWithHail => "Thunderstorm with hail",
            WeatherCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// WMO code → category. See https://open-meteo.com/en/docs#weathervariables
pub static WEATHER_CODES: &[(i32, WeatherCategory)] = &[
    (0, WeatherCategory::ClearSky),
    (1, WeatherCategory::PartlyCloudy),
    (2, WeatherCategory::PartlyCloudy),
    (3, WeatherCategory::PartlyCloudy),
    (45, WeatherCategory::Foggy),
    (48, WeatherCategory::Foggy),
    (51, WeatherCategory::Drizzle),
    (53, WeatherCategory::Drizzle),
    (55, WeatherCategory::Drizzle),
    (61, WeatherCategory::Rain),
    (63, WeatherCategory::Rain),
    (65, WeatherCategory::Rain),
    (71, WeatherCategory::Snow),
    (73, WeatherCategory::Snow),
    (75, WeatherCategory::Snow),
    (77, WeatherCategory::SnowGrains),
    (80, WeatherCategory::RainShowers),
    (81, WeatherCategory::RainShowers),
    (82, WeatherCategory::RainShowers),
    (85, WeatherCategory::SnowShowers),
    (86, WeatherCategory::SnowShowers),
    (95, WeatherCategory::Thunderstorm),
    (96, WeatherCategory::ThunderstormWithHail),
    (99, WeatherCategory::ThunderstormWithHail),
];

/// Checks that [`WEATHER_CODES`] has no duplicate codes and reaches every
/// category except `Unknown`.
pub fn validate_code_table() -> Result<()> {
    for (i, (code, _)) in WEATHER_CODES.iter().enumerate() {
        if WEATHER_CODES[..i].iter().any(|(c, _)| c == code) {
            bail!("weather code {code} is mapped more than once");
        }
    }

    for category in WeatherCategory::ALL {
        if category == WeatherCategory::Unknown {
            continue;
        }
        if !WEATHER_CODES.iter().any(|(_, c)| *c == category) {
            bail!("weather category '{category}' has no code mapped to it");
        }
    }

    Ok(())
}

/// US EPA AQI severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn from_us_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiLevel::Good
        } else if aqi <= 100.0 {
            AqiLevel::Moderate
        } else if aqi <= 150.0 {
            AqiLevel::UnhealthyForSensitive
        } else if aqi <= 200.0 {
            AqiLevel::Unhealthy
        } else if aqi <= 300.0 {
            AqiLevel::VeryUnhealthy
        } else {
            AqiLevel::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AqiLevel::Good => "#00e400",
            AqiLevel::Moderate => "#ffff00",
            AqiLevel::UnhealthyForSensitive => "#ff7e00",
            AqiLevel::Unhealthy => "#ff0000",
            AqiLevel::VeryUnhealthy => "#8f3f97",
            AqiLevel::Hazardous => "#7e0023",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Air quality is satisfactory",
            AqiLevel::Moderate => "Air quality is acceptable",
            AqiLevel::UnhealthyForSensitive => {
                "Members of sensitive groups may experience health effects"
            }
            AqiLevel::Unhealthy => "Everyone may begin to experience health effects",
            AqiLevel::VeryUnhealthy => "Health warnings of emergency conditions",
            AqiLevel::Hazardous => "Health alert: everyone may experience serious health effects",
        }
    }
}
