//! Dashboard orchestration: city search → weather fetch → displayed state.
//!
//! All displayed state lives in one [`AppState`] record that only changes
//! through [`AppState::reduce`]. Each search carries a [`SearchToken`];
//! completions for anything but the latest token are dropped, so a slow
//! earlier search can never overwrite a newer one.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    Config,
    error::{Error, Result},
    favorites::FavoritesStore,
    model::{FavoriteLocation, Location, TemperatureUnit, Theme, WeatherSnapshot},
    preferences,
    provider::{Geocoder, WeatherSource, open_meteo_from_config},
    store::{FileStore, KeyValueStore, StoreError},
};

/// Identifies one search. Issued in strictly increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SearchToken(u64);

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Text of the most recent search (or "name, country" for a favorite).
    pub search: String,
    pub city: Option<Location>,
    pub weather: Option<WeatherSnapshot>,
    pub loading: bool,
    /// Banner text for the latest failed search.
    pub error: Option<String>,
    pub unit: TemperatureUnit,
    pub theme: Theme,
    pub favorites: Vec<FavoriteLocation>,
    latest: SearchToken,
}

#[derive(Debug, Clone)]
pub enum Action {
    SearchStarted { token: SearchToken, query: String },
    SearchSucceeded { token: SearchToken, location: Location, snapshot: WeatherSnapshot },
    SearchFailed { token: SearchToken, message: String },
    UnitChanged(TemperatureUnit),
    ThemeChanged(Theme),
    FavoritesChanged(Vec<FavoriteLocation>),
}

impl AppState {
    pub fn new(unit: TemperatureUnit, theme: Theme, favorites: Vec<FavoriteLocation>) -> Self {
        Self { unit, theme, favorites, ..Self::default() }
    }

    pub fn latest_token(&self) -> SearchToken {
        self.latest
    }

    pub fn next_token(&self) -> SearchToken {
        SearchToken(self.latest.0 + 1)
    }

    pub fn is_current(&self, token: SearchToken) -> bool {
        token == self.latest
    }

    /// Whether the displayed city is starred.
    pub fn is_favorite(&self) -> bool {
        self.city.as_ref().is_some_and(|city| self.favorites.contains(city))
    }

    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::SearchStarted { token, query } => {
                self.latest = token;
                self.search = query;
                self.loading = true;
                self.error = None;
            }
            Action::SearchSucceeded { token, location, snapshot } => {
                if self.is_current(token) {
                    self.city = Some(location);
                    self.weather = Some(snapshot);
                    self.loading = false;
                    self.error = None;
                }
            }
            Action::SearchFailed { token, message } => {
                if self.is_current(token) {
                    self.loading = false;
                    self.error = Some(message);
                }
            }
            Action::UnitChanged(unit) => self.unit = unit,
            Action::ThemeChanged(theme) => self.theme = theme,
            Action::FavoritesChanged(favorites) => self.favorites = favorites,
        }
        self
    }
}

/// What happened to a search once it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The result is now displayed.
    Shown,
    /// A newer search was started meanwhile; the result was dropped.
    Superseded,
    /// The query was blank; nothing was requested.
    Skipped,
}

#[derive(Debug)]
pub struct Dashboard {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
    store: Arc<dyn KeyValueStore>,
    favorites: Mutex<FavoritesStore>,
    state: Mutex<AppState>,
}

impl Dashboard {
    /// Loads favorites and the persisted theme from `store`.
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherSource>,
        store: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Self {
        let favorites = FavoritesStore::load(store.clone());
        let theme = preferences::load_theme(store.as_ref(), config.theme);
        let state = AppState::new(config.unit, theme, favorites.items().to_vec());

        Self {
            geocoder,
            weather,
            store,
            favorites: Mutex::new(favorites),
            state: Mutex::new(state),
        }
    }

    /// Open-Meteo clients plus file-backed state under the configured directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (geocoder, weather) = open_meteo_from_config(config)?;
        let store = FileStore::new(config.state_dir()?);
        tracing::debug!(dir = %store.dir().display(), "using state directory");

        Ok(Self::new(Arc::new(geocoder), Arc::new(weather), Arc::new(store), config))
    }

    pub fn state(&self) -> AppState {
        self.state.lock().clone()
    }

    fn dispatch(&self, action: Action) {
        let mut state = self.state.lock();
        *state = std::mem::take(&mut *state).reduce(action);
    }

    fn begin(&self, query: String) -> SearchToken {
        let mut state = self.state.lock();
        let token = state.next_token();
        *state = std::mem::take(&mut *state).reduce(Action::SearchStarted { token, query });
        token
    }

    fn finish(&self, token: SearchToken, action: Action) -> SearchOutcome {
        let mut state = self.state.lock();
        if !state.is_current(token) {
            tracing::debug!(?token, latest = ?state.latest_token(), "dropping stale result");
            return SearchOutcome::Superseded;
        }
        *state = std::mem::take(&mut *state).reduce(action);
        SearchOutcome::Shown
    }

    /// Geocode `query` and show its weather.
    ///
    /// Errors are also recorded as the banner message unless a newer search
    /// has started, in which case they are dropped and `Superseded` returned.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::Skipped);
        }

        let token = self.begin(query.to_string());

        let location = match self.geocoder.resolve(query).await {
            Ok(location) => location,
            Err(e) => return self.fail(token, e),
        };

        self.show(token, location).await
    }

    /// Geocode `query` only. No weather is fetched and the page is left as is.
    pub async fn locate(&self, query: &str) -> Result<Location> {
        self.geocoder.resolve(query.trim()).await
    }

    /// Show weather for a starred location without geocoding it again.
    pub async fn select_favorite(&self, favorite: &FavoriteLocation) -> Result<SearchOutcome> {
        let token = self.begin(favorite.display_name());
        self.show(token, favorite.clone()).await
    }

    async fn show(&self, token: SearchToken, location: Location) -> Result<SearchOutcome> {
        match self.weather.fetch(location.latitude, location.longitude).await {
            Ok(snapshot) => {
                Ok(self.finish(token, Action::SearchSucceeded { token, location, snapshot }))
            }
            Err(e) => self.fail(token, e),
        }
    }

    fn fail(&self, token: SearchToken, error: Error) -> Result<SearchOutcome> {
        tracing::warn!(error = %error, "search failed");
        let message = error.user_message().to_string();
        match self.finish(token, Action::SearchFailed { token, message }) {
            SearchOutcome::Superseded => Ok(SearchOutcome::Superseded),
            _ => Err(error),
        }
    }

    /// Star or unstar the displayed city. `None` when no city is shown.
    pub fn toggle_favorite(&self) -> Result<Option<bool>, StoreError> {
        let city = self.state.lock().city.clone();
        city.map(|city| self.toggle_location(&city)).transpose()
    }

    pub fn toggle_location(&self, location: &Location) -> Result<bool, StoreError> {
        let mut favorites = self.favorites.lock();
        let starred = favorites.toggle(location)?;
        self.dispatch(Action::FavoritesChanged(favorites.items().to_vec()));
        Ok(starred)
    }

    pub fn is_favorite(&self, location: &Location) -> bool {
        self.favorites.lock().contains(location)
    }

    pub fn favorites(&self) -> Vec<FavoriteLocation> {
        self.favorites.lock().items().to_vec()
    }

    /// Flip light/dark and persist the choice.
    pub fn toggle_theme(&self) -> Result<Theme, StoreError> {
        let theme = self.state.lock().theme.toggled();
        preferences::save_theme(self.store.as_ref(), theme)?;
        self.dispatch(Action::ThemeChanged(theme));
        Ok(theme)
    }

    pub fn set_unit(&self, unit: TemperatureUnit) {
        self.dispatch(Action::UnitChanged(unit));
    }
}
