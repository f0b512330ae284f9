//! Orchestration tests for `Dashboard` using in-process fake providers.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use skywatch_core::{
    AirQuality, Config, DailyForecast, Dashboard, Error, FileStore, Geocoder, KeyValueStore,
    Location, MemoryStore, RequestError, SearchOutcome, TemperatureUnit, Theme, WeatherSnapshot,
    WeatherSource, error::Result, store::THEME_KEY,
};

#[derive(Debug, Default)]
struct FakeGeocoder {
    places: HashMap<String, Location>,
}

impl FakeGeocoder {
    fn with(places: &[Location]) -> Self {
        Self { places: places.iter().map(|p| (p.name.clone(), p.clone())).collect() }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, name: &str) -> Result<Location> {
        self.places.get(name).cloned().ok_or_else(|| Error::NotFound { query: name.to_string() })
    }
}

/// Answers after a per-latitude delay; latitudes listed in `failing` error.
#[derive(Debug, Default)]
struct FakeWeather {
    delays: HashMap<u64, Duration>,
    failing: Vec<f64>,
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        if let Some(delay) = self.delays.get(&latitude.to_bits()) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&latitude) {
            return Err(Error::Fetch(RequestError::Decode {
                endpoint: "air-quality",
                message: "boom".into(),
            }));
        }
        Ok(snapshot(latitude, longitude))
    }
}

fn place(name: &str, latitude: f64, longitude: f64) -> Location {
    Location { name: name.into(), country: "Testland".into(), latitude, longitude }
}

fn snapshot(latitude: f64, longitude: f64) -> WeatherSnapshot {
    let first = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let dates: Vec<NaiveDate> = first.iter_days().take(7).collect();
    WeatherSnapshot {
        temperature: 21.0,
        wind_speed: 3.0,
        humidity: 55.0,
        pressure: 1015.0,
        sunrise: first.and_hms_opt(5, 30, 0).unwrap(),
        sunset: first.and_hms_opt(21, 10, 0).unwrap(),
        latitude,
        longitude,
        daily_forecast: DailyForecast::new(dates, vec![24.0; 7], vec![13.0; 7], vec![1; 7])
            .unwrap(),
        air_quality: AirQuality { pm2_5: 4.0, pm10: 9.0, nitrogen_dioxide: 12.0, us_aqi: 22.0 },
    }
}

fn dashboard(geocoder: FakeGeocoder, weather: FakeWeather) -> Dashboard {
    Dashboard::new(
        Arc::new(geocoder),
        Arc::new(weather),
        Arc::new(MemoryStore::new()),
        &Config::default(),
    )
}

#[tokio::test]
async fn test_search_shows_city_and_weather() {
    let paris = place("Paris", 48.8566, 2.3522);
    let dash = dashboard(FakeGeocoder::with(&[paris.clone()]), FakeWeather::default());

    let outcome = dash.search("  Paris ").await.unwrap();
    assert_eq!(outcome, SearchOutcome::Shown);

    let state = dash.state();
    assert_eq!(state.search, "Paris");
    assert_eq!(state.city, Some(paris));
    assert_eq!(state.weather.as_ref().map(|w| w.latitude), Some(48.8566));
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_blank_search_is_skipped() {
    let dash = dashboard(FakeGeocoder::default(), FakeWeather::default());

    assert_eq!(dash.search("   ").await.unwrap(), SearchOutcome::Skipped);
    let state = dash.state();
    assert!(!state.loading);
    assert!(state.search.is_empty());
}

#[tokio::test]
async fn test_unknown_city_sets_banner() {
    let dash = dashboard(FakeGeocoder::default(), FakeWeather::default());

    let err = dash.search("Atlantis").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let state = dash.state();
    assert_eq!(state.error.as_deref(), Some("City not found"));
    assert!(state.weather.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_failed_fetch_shows_no_partial_snapshot() {
    let paris = place("Paris", 48.8566, 2.3522);
    let weather = FakeWeather { failing: vec![48.8566], ..FakeWeather::default() };
    let dash = dashboard(FakeGeocoder::with(&[paris]), weather);

    let err = dash.search("Paris").await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));

    let state = dash.state();
    assert!(state.city.is_none());
    assert!(state.weather.is_none());
    assert_eq!(state.error.as_deref(), Some("Failed to fetch weather data"));
}

#[tokio::test]
async fn test_later_search_wins_over_slower_earlier_one() {
    let slow = place("Slowtown", 10.0, 10.0);
    let fast = place("Fastville", 20.0, 20.0);
    let weather = FakeWeather {
        delays: HashMap::from([(10.0f64.to_bits(), Duration::from_millis(200))]),
        ..FakeWeather::default()
    };
    let dash = dashboard(FakeGeocoder::with(&[slow, fast.clone()]), weather);

    let (first, second) = tokio::join!(dash.search("Slowtown"), dash.search("Fastville"));

    assert_eq!(first.unwrap(), SearchOutcome::Superseded);
    assert_eq!(second.unwrap(), SearchOutcome::Shown);

    let state = dash.state();
    assert_eq!(state.city, Some(fast));
    assert_eq!(state.search, "Fastville");
    assert_eq!(state.weather.as_ref().map(|w| w.latitude), Some(20.0));
}

#[tokio::test]
async fn test_stale_failure_does_not_set_banner() {
    let slow = place("Slowtown", 10.0, 10.0);
    let fast = place("Fastville", 20.0, 20.0);
    let weather = FakeWeather {
        delays: HashMap::from([(10.0f64.to_bits(), Duration::from_millis(200))]),
        failing: vec![10.0],
    };
    let dash = dashboard(FakeGeocoder::with(&[slow, fast]), weather);

    let (first, second) = tokio::join!(dash.search("Slowtown"), dash.search("Fastville"));

    assert_eq!(first.unwrap(), SearchOutcome::Superseded);
    assert_eq!(second.unwrap(), SearchOutcome::Shown);
    assert_eq!(dash.state().error, None);
}

#[tokio::test]
async fn test_select_favorite_skips_geocoding() {
    let oslo = place("Oslo", 59.9127, 10.7461);
    // Geocoder knows nothing; selecting a favorite must not need it.
    let dash = dashboard(FakeGeocoder::default(), FakeWeather::default());

    let outcome = dash.select_favorite(&oslo).await.unwrap();

    assert_eq!(outcome, SearchOutcome::Shown);
    let state = dash.state();
    assert_eq!(state.search, "Oslo, Testland");
    assert_eq!(state.city, Some(oslo));
}

#[tokio::test]
async fn test_toggle_favorite_for_displayed_city() {
    let paris = place("Paris", 48.8566, 2.3522);
    let dash = dashboard(FakeGeocoder::with(&[paris.clone()]), FakeWeather::default());

    assert_eq!(dash.toggle_favorite().unwrap(), None);

    dash.search("Paris").await.unwrap();
    assert!(!dash.state().is_favorite());

    assert_eq!(dash.toggle_favorite().unwrap(), Some(true));
    assert!(dash.state().is_favorite());
    assert_eq!(dash.favorites(), vec![paris.clone()]);

    assert_eq!(dash.toggle_favorite().unwrap(), Some(false));
    assert!(!dash.state().is_favorite());
    assert!(!dash.is_favorite(&paris));
}

#[tokio::test]
async fn test_locate_stars_city_while_weather_is_down() {
    let paris = place("Paris", 48.8566, 2.3522);
    let weather = FakeWeather { failing: vec![48.8566], ..FakeWeather::default() };
    let dash = dashboard(FakeGeocoder::with(&[paris.clone()]), weather);

    let found = dash.locate(" Paris ").await.unwrap();
    assert_eq!(found, paris);
    assert!(dash.toggle_location(&found).unwrap());
    assert_eq!(dash.favorites(), vec![paris]);

    let state = dash.state();
    assert!(state.city.is_none());
    assert!(state.weather.is_none());
    assert_eq!(state.error, None);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_locate_unknown_city_leaves_state_alone() {
    let dash = dashboard(FakeGeocoder::default(), FakeWeather::default());

    let err = dash.locate("Atlantis").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(dash.state().error, None);
    assert!(dash.favorites().is_empty());
}

#[tokio::test]
async fn test_state_survives_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let paris = place("Paris", 48.8566, 2.3522);
    let oslo = place("Oslo", 59.9127, 10.7461);

    let open = || {
        Dashboard::new(
            Arc::new(FakeGeocoder::default()),
            Arc::new(FakeWeather::default()),
            Arc::new(FileStore::new(dir.path())),
            &Config::default(),
        )
    };

    let dash = open();
    dash.toggle_location(&paris).unwrap();
    dash.toggle_location(&oslo).unwrap();
    assert_eq!(dash.toggle_theme().unwrap(), Theme::Dark);
    drop(dash);

    let reopened = open();
    let state = reopened.state();
    assert_eq!(state.favorites, vec![paris, oslo]);
    assert_eq!(state.theme, Theme::Dark);
}

#[tokio::test]
async fn test_corrupt_theme_falls_back_to_config() {
    let store = Arc::new(MemoryStore::new());
    store.set(THEME_KEY, "not-json").unwrap();
    let config = Config { theme: Theme::Dark, ..Config::default() };

    let dash = Dashboard::new(
        Arc::new(FakeGeocoder::default()),
        Arc::new(FakeWeather::default()),
        store,
        &config,
    );

    assert_eq!(dash.state().theme, Theme::Dark);
}

#[tokio::test]
async fn test_unit_changes_do_not_touch_snapshot() {
    let paris = place("Paris", 48.8566, 2.3522);
    let dash = dashboard(FakeGeocoder::with(&[paris]), FakeWeather::default());
    dash.search("Paris").await.unwrap();

    dash.set_unit(TemperatureUnit::Fahrenheit);

    let state = dash.state();
    assert_eq!(state.unit, TemperatureUnit::Fahrenheit);
    assert_eq!(state.weather.map(|w| w.temperature), Some(21.0));
}
