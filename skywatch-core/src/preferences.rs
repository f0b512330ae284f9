use crate::{
    model::Theme,
    store::{KeyValueStore, StoreError, THEME_KEY, load_json, save_json},
};

/// The persisted theme, or `fallback` when none is stored or it can't be read.
pub fn load_theme(store: &dyn KeyValueStore, fallback: Theme) -> Theme {
    match load_json::<Theme>(store, THEME_KEY) {
        Ok(Some(theme)) => theme,
        Ok(None) => fallback,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable theme");
            fallback
        }
    }
}

pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<(), StoreError> {
    save_json(store, THEME_KEY, &theme)
}

/// Accent colours for the two themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub background: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette { primary: "#646cff", background: "#1a1a1a" },
            Theme::Light => Palette { primary: "#535bf2", background: "#f6f6f6" },
        }
    }
}
