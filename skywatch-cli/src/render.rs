//! Text rendering of the dashboard page.

use std::io::IsTerminal;

use skywatch_core::{
    AppState, WeatherSnapshot,
    display::{
        format_coordinates, format_date, format_degrees, format_humidity, format_pollutant,
        format_pressure, format_temp, format_time, format_wind, map_url,
    },
    model::TemperatureUnit,
    preferences::Palette,
};

pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Applies 24-bit ANSI colours when enabled, otherwise passes text through.
#[derive(Debug, Clone, Copy)]
struct Paint {
    enabled: bool,
}

impl Paint {
    fn hex(&self, text: &str, hex: &str) -> String {
        match (self.enabled, rgb(hex)) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.enabled { format!("\x1b[1m{text}\x1b[0m") } else { text.to_string() }
    }
}

fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn page(state: &AppState, color: bool) -> String {
    let paint = Paint { enabled: color };
    let palette = Palette::for_theme(state.theme);
    let mut lines = vec![format!(
        "{}  ·  {} theme  ·  {}",
        paint.bold(&paint.hex("SkyWatch", palette.primary)),
        state.theme,
        state.unit,
    )];

    if !state.favorites.is_empty() {
        let chips: Vec<String> = state
            .favorites
            .iter()
            .enumerate()
            .map(|(i, fav)| format!("[{}] {}", i + 1, fav.display_name()))
            .collect();
        lines.push(format!("★ Favorites: {}", chips.join("  ")));
    }

    if state.loading {
        lines.push("Loading…".to_string());
    }
    if let Some(error) = &state.error {
        lines.push(paint.hex(&format!("⚠ {error}"), "#ff0000"));
    }

    if let (Some(city), Some(weather)) = (&state.city, &state.weather) {
        let star = if state.is_favorite() { "★" } else { "☆" };
        lines.push(String::new());
        lines.push(format!(
            "{} {}",
            paint.bold(&city.display_name()),
            paint.hex(star, palette.primary)
        ));
        lines.extend(weather_section(weather, state.unit, paint, palette));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn weather_section(
    weather: &WeatherSnapshot,
    unit: TemperatureUnit,
    paint: Paint,
    palette: Palette,
) -> Vec<String> {
    let mut lines = vec![
        format!("  {}", paint.bold(&format_temp(weather.temperature, unit))),
        format!("  {:<12}{}", "Humidity", format_humidity(weather.humidity)),
        format!("  {:<12}{}", "Wind Speed", format_wind(weather.wind_speed)),
        format!("  {:<12}{}", "Pressure", format_pressure(weather.pressure)),
        format!("  {:<12}{}", "Sunrise", format_time(weather.sunrise)),
        format!("  {:<12}{}", "Sunset", format_time(weather.sunset)),
        String::new(),
    ];

    let air = &weather.air_quality;
    let level = air.level();
    lines.push(format!(
        "{} {} (AQI: {})",
        paint.hex("Air Quality:", palette.primary),
        paint.hex(level.label(), level.color()),
        air.us_aqi.round(),
    ));
    lines.push(format!("  {}", level.description()));
    lines.push(format!(
        "  PM2.5 {}   PM10 {}   NO₂ {}",
        format_pollutant(air.pm2_5),
        format_pollutant(air.pm10),
        format_pollutant(air.nitrogen_dioxide),
    ));
    lines.push(String::new());

    lines.push(paint.hex("5-Day Forecast", palette.primary));
    for day in weather.daily_forecast.upcoming() {
        lines.push(format!(
            "  {:<13}{:>5} / {:<5}{}",
            format_date(day.date),
            format_degrees(day.temperature_max, unit),
            format_degrees(day.temperature_min, unit),
            day.category(),
        ));
    }
    lines.push(String::new());

    lines.push(format_coordinates(weather.latitude, weather.longitude));
    lines.push(format!("Map: {}", map_url(weather.latitude, weather.longitude)));
    lines
}

pub fn about() -> String {
    let features = [
        "Real-time weather updates",
        "Five-day weather forecast",
        "Air quality monitoring",
        "Interactive weather maps",
        "Sunrise and sunset times",
        "Favorite locations management",
        "Dark/Light theme support",
    ];

    let mut lines = vec![
        "About SkyWatch".to_string(),
        "Your Personal Weather Companion".to_string(),
        String::new(),
        "SkyWatch provides accurate, real-time weather information in a simple view:".to_string(),
        "current conditions, 5-day forecasts, air quality and weather maps.".to_string(),
        String::new(),
        "Features".to_string(),
    ];
    lines.extend(features.iter().map(|f| format!("  • {f}")));
    lines.push(String::new());
    lines.push("Weather data by Open-Meteo (https://open-meteo.com/)".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skywatch_core::{AirQuality, DailyForecast, Location, Theme};

    fn state() -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let dates: Vec<NaiveDate> = today.iter_days().take(7).collect();
        let paris = Location {
            name: "Paris".into(),
            country: "France".into(),
            latitude: 48.8566,
            longitude: 2.3522,
        };

        let mut state = AppState::new(TemperatureUnit::Celsius, Theme::Dark, vec![paris.clone()]);
        state.city = Some(paris);
        state.weather = Some(WeatherSnapshot {
            temperature: 4.6,
            wind_speed: 5.4,
            humidity: 81.0,
            pressure: 1021.3,
            sunrise: today.and_hms_opt(8, 40, 0).unwrap(),
            sunset: today.and_hms_opt(17, 17, 0).unwrap(),
            latitude: 48.8566,
            longitude: 2.3522,
            daily_forecast: DailyForecast::new(
                dates,
                vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0],
                vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                vec![0, 3, 45, 61, 71, 95, 0],
            )
            .unwrap(),
            air_quality: AirQuality { pm2_5: 7.26, pm10: 12.0, nitrogen_dioxide: 30.1, us_aqi: 120.0 },
        });
        state
    }

    #[test]
    fn page_shows_current_conditions() {
        let text = page(&state(), false);

        assert!(text.contains("Paris, France ★"));
        assert!(text.contains("5°C"));
        assert!(text.contains("81%"));
        assert!(text.contains("5 m/s"));
        assert!(text.contains("1021 hPa"));
        assert!(text.contains("8:40 AM"));
        assert!(text.contains("5:17 PM"));
        assert!(text.contains("Lat: 48.86° | Lon: 2.35°"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn page_shows_air_quality_tier() {
        let text = page(&state(), false);
        assert!(text.contains("Unhealthy for Sensitive Groups (AQI: 120)"));
        assert!(text.contains("PM2.5 7.3 µg/m³"));
    }

    #[test]
    fn forecast_lists_five_days_after_today() {
        let text = page(&state(), false);

        assert!(!text.contains("Mon, Jan 15"));
        for day in ["Tue, Jan 16", "Wed, Jan 17", "Thu, Jan 18", "Fri, Jan 19", "Sat, Jan 20"] {
            assert!(text.contains(day), "missing {day}");
        }
        assert!(!text.contains("Sun, Jan 21"));
        assert!(text.contains("Thunderstorm"));
    }

    #[test]
    fn fahrenheit_changes_display_only() {
        let mut state = state();
        state.unit = TemperatureUnit::Fahrenheit;
        let text = page(&state, false);
        assert!(text.contains("40°F"));
    }

    #[test]
    fn banner_and_no_weather() {
        let mut state = AppState::default();
        state.error = Some("City not found".into());
        let text = page(&state, false);
        assert!(text.contains("⚠ City not found"));
        assert!(!text.contains("Forecast"));
    }

    #[test]
    fn colours_use_truecolor_escapes() {
        let text = page(&state(), true);
        assert!(text.contains("\x1b[38;2;100;108;255m"));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(rgb("#646cff"), Some((100, 108, 255)));
        assert_eq!(rgb("646cff"), None);
        assert_eq!(rgb("#fff"), None);
    }

    #[test]
    fn about_lists_features() {
        let text = about();
        assert!(text.contains("Favorite locations management"));
        assert!(text.contains("open-meteo.com"));
    }
}
