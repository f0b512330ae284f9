use std::sync::Arc;

use crate::{
    model::FavoriteLocation,
    store::{FAVORITES_KEY, KeyValueStore, StoreError, load_json, save_json},
};

/// Starred locations, kept in insertion order and rewritten in full on every
/// change.
#[derive(Debug)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    items: Vec<FavoriteLocation>,
}

impl FavoritesStore {
    /// Read the persisted list. Missing or malformed data yields an empty
    /// list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match load_json::<Vec<FavoriteLocation>>(store.as_ref(), FAVORITES_KEY) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable favorites");
                Vec::new()
            }
        };

        Self { store, items }
    }

    pub fn items(&self) -> &[FavoriteLocation] {
        &self.items
    }

    pub fn contains(&self, location: &FavoriteLocation) -> bool {
        self.items.iter().any(|fav| fav == location)
    }

    /// Add `location` if absent, remove it if present. Returns whether it is
    /// starred afterwards.
    ///
    /// The new list is written before it replaces the in-memory one, so a
    /// failed write leaves both unchanged.
    pub fn toggle(&mut self, location: &FavoriteLocation) -> Result<bool, StoreError> {
        let starred = !self.contains(location);

        let next: Vec<FavoriteLocation> = if starred {
            self.items.iter().cloned().chain(std::iter::once(location.clone())).collect()
        } else {
            self.items.iter().filter(|fav| *fav != location).cloned().collect()
        };

        save_json(self.store.as_ref(), FAVORITES_KEY, &next)?;
        self.items = next;

        tracing::info!(location = %location.display_name(), starred, "toggled favorite");
        Ok(starred)
    }
}
