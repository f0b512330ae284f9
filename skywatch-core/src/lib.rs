//! Core library for the `skywatch` weather dashboard.
//!
//! This crate defines:
//! - Configuration loading and the persisted key-value state
//! - Open-Meteo geocoding, forecast and air-quality clients
//! - Shared domain models and display helpers
//! - The dashboard orchestrator that ties search, fetch and favorites together
//!
//! It is used by `skywatch-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod favorites;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod store;

pub use app::{AppState, Dashboard, SearchOutcome};
pub use config::{Config, Endpoints};
pub use error::{Error, RequestError};
pub use favorites::FavoritesStore;
pub use model::{
    AirQuality, DailyForecast, DayForecast, FavoriteLocation, Location, TemperatureUnit, Theme,
    WeatherSnapshot,
};
pub use provider::{Geocoder, WeatherSource};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
