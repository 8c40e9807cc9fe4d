//! The client state store.
//!
//! ARCHITECTURE
//! ============
//! [`Store`] composes the `ui`, `session`, and `user` slices into one
//! [`RootState`]. `dispatch` applies the slice transition, then runs the
//! installed middleware, then notifies subscribers, all on the calling
//! thread. The store is a cheap `Clone` handle over `Rc<RefCell<..>>` and is
//! deliberately `!Send`: it models a single browser event loop.
//!
//! DESIGN
//! ======
//! The state tree is held as `Rc<RootState>`. Transitions go through
//! `Rc::make_mut`, so a snapshot handed out by [`Store::state`] never changes
//! under its holder, and no `RefCell` borrow is held while middleware or
//! subscribers run. Subscribers may therefore dispatch re-entrantly; each
//! one is handed the state current at its own call.
//!
//! Sign-in is the only async operation. [`Store::sign_in`] dispatches the
//! pending phase before returning its future, so the loading flag is visible
//! synchronously; the future later re-enters `dispatch` with the fulfilled
//! or rejected phase.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod action;
pub mod middleware;
pub mod selectors;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use action::Action;
use middleware::{ActionLog, Middleware, ThemeMiddleware};

use crate::config::{ConfigError, StoreConfig};
use crate::net::auth::{Authenticator, Credentials};
use crate::state::session::SessionState;
use crate::state::ui::UiState;
use crate::state::user::{RequestId, SignInPhase, UserAction, UserState};
use crate::util::environment::Environment;

/// The whole client state tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    pub ui: UiState,
    pub session: SessionState,
    pub user: UserState,
}

impl RootState {
    /// Route an intent to the slice that owns it.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Ui(action) => self.ui.apply(action),
            Action::Session(action) => self.session.apply(action),
            Action::User(action) => self.user.apply(action),
        }
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&RootState)>;

struct Inner {
    state: Rc<RootState>,
    middleware: Vec<Rc<dyn Middleware>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    action_log: Option<Rc<ActionLog>>,
    next_subscription: u64,
    next_request: u64,
}

/// Shared, single-threaded client store.
#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<Inner>>,
    authenticator: Rc<dyn Authenticator>,
}

/// Build the application store: validate config, install the theme
/// middleware over `environment`, and the action log when enabled.
pub fn init_store(
    config: &StoreConfig,
    environment: &Environment,
    authenticator: Rc<dyn Authenticator>,
) -> Result<Store, ConfigError> {
    config.validate()?;
    let store = Store::new(authenticator);
    store.add_middleware(Rc::new(ThemeMiddleware::new(
        Rc::clone(&environment.storage),
        Rc::clone(&environment.document),
        config.theme_storage_key.clone(),
        config.dark_mode_class.clone(),
    )));
    if config.action_log_capacity > 0 {
        let log = Rc::new(ActionLog::new(config.action_log_capacity));
        store.add_middleware(Rc::clone(&log) as Rc<dyn Middleware>);
        store.inner.borrow_mut().action_log = Some(log);
    }
    info!(
        theme_key = %config.theme_storage_key,
        action_log = config.action_log_capacity,
        "store initialized"
    );
    Ok(store)
}

impl Store {
    /// A store with default slices and no middleware.
    pub fn new(authenticator: Rc<dyn Authenticator>) -> Self {
        Self::with_state(RootState::default(), authenticator)
    }

    /// A store seeded with `state`, e.g. a restored snapshot.
    pub fn with_state(state: RootState, authenticator: Rc<dyn Authenticator>) -> Self {
        let inner = Inner {
            state: Rc::new(state),
            middleware: Vec::new(),
            listeners: Vec::new(),
            action_log: None,
            next_subscription: 0,
            next_request: 0,
        };
        Self { inner: Rc::new(RefCell::new(inner)), authenticator }
    }

    /// Append a middleware; it runs after those already installed.
    pub fn add_middleware(&self, middleware: Rc<dyn Middleware>) {
        self.inner.borrow_mut().middleware.push(middleware);
    }

    /// Apply an intent, run middleware, then notify subscribers.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        debug!(action = action.type_name(), "dispatch");

        let (snapshot, middleware, listeners) = {
            let mut inner = self.inner.borrow_mut();
            Rc::make_mut(&mut inner.state).apply(&action);
            let listeners: Vec<Listener> = inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (Rc::clone(&inner.state), inner.middleware.clone(), listeners)
        };

        for m in &middleware {
            m.after_reduce(&action, &snapshot);
        }
        // A listener may dispatch, so each one reads the state current at its call.
        for listener in &listeners {
            listener(&self.state());
        }
    }

    /// Current state snapshot. Later dispatches do not mutate it.
    pub fn state(&self) -> Rc<RootState> {
        Rc::clone(&self.inner.borrow().state)
    }

    /// Project the current state through `selector`.
    pub fn select<T>(&self, selector: impl FnOnce(&RootState) -> T) -> T {
        selector(&self.state())
    }

    /// Call `listener` with the current state after every dispatch.
    ///
    /// When an earlier listener dispatches re-entrantly, later listeners see
    /// the state left by that nested dispatch, never an older one.
    pub fn subscribe(&self, listener: impl Fn(&RootState) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    /// Recent action types, oldest first. Empty when the log is disabled.
    pub fn action_log(&self) -> Vec<&'static str> {
        self.inner.borrow().action_log.as_ref().map(|log| log.entries()).unwrap_or_default()
    }

    /// Start a sign-in attempt.
    ///
    /// The pending phase is dispatched before this returns. The returned
    /// future resolves exactly once, after dispatching the fulfilled or
    /// rejected phase; failures never escape it. There is no cancellation,
    /// and overlapping attempts are not de-duplicated.
    pub fn sign_in(&self, credentials: Credentials) -> impl Future<Output = SignInPhase> + use<> {
        let request_id = self.next_request_id();
        self.dispatch(UserAction::SignInPending { request_id });

        let store = self.clone();
        let authenticator = Rc::clone(&self.authenticator);
        async move {
            match authenticator.authenticate(&credentials).await {
                Ok(user) => {
                    info!(%request_id, user_id = %user.id, "sign-in succeeded");
                    store.dispatch(UserAction::SignInFulfilled { request_id, user });
                    SignInPhase::Succeeded
                }
                Err(e) => {
                    warn!(%request_id, error = %e, "sign-in failed");
                    store.dispatch(UserAction::SignInRejected { request_id, message: e.user_message() });
                    SignInPhase::Failed
                }
            }
        }
    }

    fn next_request_id(&self) -> RequestId {
        let mut inner = self.inner.borrow_mut();
        inner.next_request += 1;
        RequestId(inner.next_request)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("middleware", &inner.middleware.len())
            .field("listeners", &inner.listeners.len())
            .finish_non_exhaustive()
    }
}
