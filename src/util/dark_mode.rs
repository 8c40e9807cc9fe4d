//! Theme initialization and document dark-mode reconciliation.
//!
//! Reads the stored theme (falling back to the system color-scheme
//! preference), seeds the UI slice with it, and keeps the dark-mode class on
//! the document root in step with the slice.
//!
//! TRADE-OFFS
//! ==========
//! Persistence and class updates are best-effort: backend failures are
//! logged and swallowed so a broken `localStorage` never blocks startup.
//! Reconciliation reads the theme after the seeding dispatch, so the very
//! first render already carries the resolved class.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::document::{ColorSchemeQuery, DocumentRoot};
use super::environment::Environment;
use super::storage::KeyValueStorage;
use crate::config::StoreConfig;
use crate::state::ui::{Theme, UiAction};
use crate::store::{Store, SubscriptionId, selectors};

/// Read a valid theme from storage. Missing, malformed, and unreadable values
/// all read as `None`.
pub fn read_stored(storage: &dyn KeyValueStorage, key: &str) -> Option<Theme> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, key, "theme storage read failed");
            return None;
        }
    };
    match raw.parse::<Theme>() {
        Ok(theme) => Some(theme),
        Err(e) => {
            debug!(error = %e, key, "ignoring malformed stored theme");
            None
        }
    }
}

/// Startup theme: stored value, else dark if the system prefers it.
/// `None` means keep the slice default.
pub fn resolve_initial(storage: &dyn KeyValueStorage, preference: &dyn ColorSchemeQuery, key: &str) -> Option<Theme> {
    read_stored(storage, key).or_else(|| preference.prefers_dark().then_some(Theme::Dark))
}

/// Write `theme` to storage under `key`.
pub fn persist(storage: &dyn KeyValueStorage, key: &str, theme: Theme) {
    if let Err(e) = storage.set_item(key, theme.as_str()) {
        warn!(error = %e, key, %theme, "theme persist failed");
    }
}

/// Set `class` on the document root iff `theme` is dark.
pub fn apply(document: &dyn DocumentRoot, class: &str, theme: Theme) {
    if let Err(e) = document.set_class(class, theme.is_dark()) {
        warn!(error = %e, class, %theme, "dark-mode class update failed");
    }
}

/// Keeps the document class in step with the theme while alive.
///
/// Dropping it removes the store subscription.
#[derive(Debug)]
pub struct ThemeSync {
    store: Store,
    subscription: SubscriptionId,
}

impl Drop for ThemeSync {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

/// Run the startup theme routine once.
///
/// 1. A valid stored theme is dispatched as-is.
/// 2. Otherwise a system dark preference dispatches [`Theme::Dark`].
/// 3. Otherwise the slice keeps its default.
///
/// The document class is then reconciled with the slice theme, and again on
/// every later theme change for as long as the returned [`ThemeSync`] lives.
pub fn initialize(store: &Store, environment: &Environment, config: &StoreConfig) -> ThemeSync {
    let key = config.theme_storage_key.as_str();
    if let Some(theme) = resolve_initial(environment.storage.as_ref(), environment.preference.as_ref(), key) {
        debug!(%theme, "seeding theme");
        store.dispatch(UiAction::SetTheme(theme));
    }

    let theme = store.select(selectors::theme);
    apply(environment.document.as_ref(), &config.dark_mode_class, theme);

    let last = Rc::new(Cell::new(theme));
    let document = Rc::clone(&environment.document);
    let class = config.dark_mode_class.clone();
    let subscription = store.subscribe(move |state| {
        let theme = selectors::theme(state);
        if theme != last.get() {
            last.set(theme);
            apply(document.as_ref(), &class, theme);
        }
    });

    ThemeSync { store: store.clone(), subscription }
}
