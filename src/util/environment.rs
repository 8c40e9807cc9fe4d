//! The bundle of platform backends the store and theme initializer talk to.

use std::rc::Rc;

use super::document::{ColorSchemeQuery, DocumentRoot, FixedPreference, MemoryDocument};
use super::storage::{KeyValueStorage, MemoryStorage};

/// Storage, document root, and color-scheme query for one running client.
#[derive(Clone)]
pub struct Environment {
    pub storage: Rc<dyn KeyValueStorage>,
    pub document: Rc<dyn DocumentRoot>,
    pub preference: Rc<dyn ColorSchemeQuery>,
}

impl Environment {
    pub fn new(
        storage: Rc<dyn KeyValueStorage>,
        document: Rc<dyn DocumentRoot>,
        preference: Rc<dyn ColorSchemeQuery>,
    ) -> Self {
        Self { storage, document, preference }
    }

    /// Empty storage, a bare document, and no dark preference.
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()), Rc::new(MemoryDocument::new()), Rc::new(FixedPreference(false)))
    }

    /// `localStorage`, `document.documentElement`, and `matchMedia`.
    #[cfg(feature = "hydrate")]
    pub fn browser() -> Self {
        use super::document::{BrowserDocument, BrowserPreference};
        use super::storage::BrowserStorage;

        Self::new(Rc::new(BrowserStorage), Rc::new(BrowserDocument), Rc::new(BrowserPreference))
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}
