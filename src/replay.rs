//! Headless replay of a recorded action script.
//!
//! Builds a store over in-memory backends, runs the theme initializer, applies
//! the actions in order, and optionally finishes with a demo sign-in. The
//! `qadesk replay` command prints the resulting [`ReplayReport`].

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;

use std::rc::Rc;

use serde::Serialize;
use tracing::info;

use crate::config::{ConfigError, StoreConfig};
use crate::net::auth::{Credentials, DemoAuthenticator};
use crate::store::{Action, RootState, init_store};
use crate::util::dark_mode;
use crate::util::document::{DocumentError, DocumentRoot, FixedPreference, MemoryDocument};
use crate::util::environment::Environment;
use crate::util::storage::{KeyValueStorage, MemoryStorage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Startup conditions for a replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Value present in theme storage before startup.
    pub stored_theme: Option<String>,
    /// System dark-mode preference reported to the initializer.
    pub prefers_dark: bool,
    /// Email to sign in with after the script runs.
    pub sign_in: Option<String>,
}

/// Final state plus the side effects the browser would have observed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub state: RootState,
    pub stored_theme: Option<String>,
    pub dark_class: bool,
    pub action_log: Vec<&'static str>,
}

pub async fn replay(
    config: &StoreConfig,
    actions: Vec<Action>,
    options: ReplayOptions,
) -> Result<ReplayReport, ReplayError> {
    let storage = match &options.stored_theme {
        Some(theme) => MemoryStorage::with_item(&config.theme_storage_key, theme),
        None => MemoryStorage::new(),
    };
    let environment = Environment::new(
        Rc::new(storage),
        Rc::new(MemoryDocument::new()),
        Rc::new(FixedPreference(options.prefers_dark)),
    );

    let store = init_store(config, &environment, Rc::new(DemoAuthenticator))?;
    let _theme_sync = dark_mode::initialize(&store, &environment, config);

    info!(count = actions.len(), "replaying actions");
    for action in actions {
        store.dispatch(action);
    }
    if let Some(email) = options.sign_in {
        store.sign_in(Credentials::new(email, "")).await;
    }

    Ok(ReplayReport {
        state: RootState::clone(&store.state()),
        stored_theme: environment.storage.get_item(&config.theme_storage_key)?,
        dark_class: environment.document.has_class(&config.dark_mode_class)?,
        action_log: store.action_log(),
    })
}
