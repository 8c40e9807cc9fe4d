use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::*;
use crate::net::auth::{AuthError, DemoAuthenticator};
use crate::state::session::{Participant, ParticipantRole, Point, SessionAction, StartSession};
use crate::state::ui::{Theme, UiAction};
use crate::state::user::{SignInRequest, User};
use crate::util::document::MemoryDocument;
use crate::util::storage::{KeyValueStorage, MemoryStorage};

fn demo_store() -> Store {
    Store::new(Rc::new(DemoAuthenticator))
}

fn user(email: &str) -> User {
    User {
        id: email.to_owned(),
        email: email.to_owned(),
        display_name: email.to_owned(),
        avatar_url: None,
        is_online: true,
        last_active: None,
    }
}

type Gate = oneshot::Receiver<Result<User, AuthError>>;

/// Each `authenticate` call waits on the next gate in line.
struct GatedAuthenticator {
    gates: RefCell<VecDeque<Gate>>,
}

impl GatedAuthenticator {
    fn new(gates: Vec<Gate>) -> Self {
        Self { gates: RefCell::new(gates.into()) }
    }
}

#[async_trait(?Send)]
impl Authenticator for GatedAuthenticator {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<User, AuthError> {
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(AuthError::Unavailable("gate dropped".to_owned()))),
            None => Err(AuthError::Unavailable("no gate".to_owned())),
        }
    }
}

struct FailingAuthenticator(AuthError);

#[async_trait(?Send)]
impl Authenticator for FailingAuthenticator {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<User, AuthError> {
        Err(self.0.clone())
    }
}

// =============================================================================
// dispatch / state
// =============================================================================

#[test]
fn new_store_holds_default_state() {
    assert_eq!(*demo_store().state(), RootState::default());
}

#[test]
fn dispatch_routes_to_owning_slice() {
    let store = demo_store();
    store.dispatch(UiAction::SetActiveTool(Some("pin".to_owned())));
    store.dispatch(SessionAction::StartSession(StartSession::new("p1", "http://x")));
    store.dispatch(UserAction::SetUser(user("a@b.com")));

    let state = store.state();
    assert_eq!(state.ui.active_tool_id.as_deref(), Some("pin"));
    assert!(state.session.is_active);
    assert!(state.user.is_authenticated);
}

#[test]
fn snapshots_do_not_change_after_dispatch() {
    let store = demo_store();
    let before = store.state();
    store.dispatch(UiAction::ToggleSidebar);
    assert!(before.ui.sidebar_open);
    assert!(!store.state().ui.sidebar_open);
}

#[test]
fn start_session_scenario() {
    let store = demo_store();
    store.dispatch(SessionAction::StartSession(StartSession {
        id: "s1".to_owned(),
        project_id: "p1".to_owned(),
        target_url: "http://x".to_owned(),
        figma_url: None,
    }));
    let state = store.state();
    assert!(selectors::is_session_active(&state));
    assert!(state.session.started_at.is_some());
    assert!(selectors::figma_url(&state).is_none());
}

#[test]
fn cursor_scenario() {
    let store = demo_store();
    let ann = Participant {
        id: "u1".to_owned(),
        name: "Ann".to_owned(),
        role: ParticipantRole::Editor,
        is_active: true,
        cursor_position: None,
    };
    store.dispatch(SessionAction::AddParticipant(ann.clone()));
    store.dispatch(SessionAction::UpdateCursorPosition {
        participant_id: "u1".to_owned(),
        position: Point { x: 5.0, y: 7.0 },
    });
    let participant = store.select(|s| selectors::participant_by_id(s, "u1").cloned());
    assert_eq!(participant, Some(Participant { cursor_position: Some(Point { x: 5.0, y: 7.0 }), ..ann }));
}

#[test]
fn with_state_seeds_store() {
    let mut seeded = RootState::default();
    seeded.ui.theme = Theme::Dark;
    let store = Store::with_state(seeded, Rc::new(DemoAuthenticator));
    assert_eq!(store.select(selectors::theme), Theme::Dark);
}

#[test]
fn root_state_round_trips_through_json() {
    let store = demo_store();
    store.dispatch(UiAction::OpenModal("share".to_owned()));
    let json = serde_json::to_string(&*store.state()).unwrap();
    let restored: RootState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, *store.state());
    assert!(json.contains("\"sidebarOpen\":true"));
}

// =============================================================================
// subscriptions
// =============================================================================

#[test]
fn subscribers_see_new_state_until_unsubscribed() {
    let store = demo_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe(move |state| sink.borrow_mut().push(state.ui.sidebar_open));

    store.dispatch(UiAction::ToggleSidebar);
    store.dispatch(UiAction::ToggleSidebar);
    assert!(store.unsubscribe(id));
    store.dispatch(UiAction::ToggleSidebar);

    assert_eq!(*seen.borrow(), vec![false, true]);
    assert!(!store.unsubscribe(id));
}

#[test]
fn subscriber_may_dispatch_reentrantly() {
    let store = demo_store();
    let handle = store.clone();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    store.subscribe(move |state| {
        counter.set(counter.get() + 1);
        if state.session.is_active {
            handle.dispatch(SessionAction::EndSession);
        }
    });

    store.dispatch(SessionAction::StartSession(StartSession::new("p1", "http://x")));
    assert!(!store.state().session.is_active);
    assert_eq!(calls.get(), 2);
}

#[test]
fn later_subscribers_see_state_from_nested_dispatch() {
    let store = demo_store();
    let handle = store.clone();
    store.subscribe(move |state| {
        if state.ui.theme.is_dark() {
            handle.dispatch(UiAction::SetTheme(Theme::Light));
        }
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |state| sink.borrow_mut().push(state.ui.theme));

    store.dispatch(UiAction::SetTheme(Theme::Dark));
    assert_eq!(store.state().ui.theme, Theme::Light);
    assert_eq!(*seen.borrow(), vec![Theme::Light, Theme::Light]);
}

// =============================================================================
// init_store
// =============================================================================

#[test]
fn init_store_installs_theme_middleware() {
    let storage = Rc::new(MemoryStorage::new());
    let document = Rc::new(MemoryDocument::new());
    let env = Environment::new(
        storage.clone(),
        document.clone(),
        Rc::new(crate::util::document::FixedPreference(false)),
    );
    let store = init_store(&StoreConfig::default(), &env, Rc::new(DemoAuthenticator)).unwrap();

    store.dispatch(UiAction::SetTheme(Theme::Dark));
    assert_eq!(storage.get_item("theme"), Ok(Some("dark".to_owned())));
    assert_eq!(document.classes(), vec!["dark".to_owned()]);
}

#[test]
fn init_store_honors_custom_key_and_class() {
    let storage = Rc::new(MemoryStorage::new());
    let document = Rc::new(MemoryDocument::new());
    let env = Environment::new(
        storage.clone(),
        document.clone(),
        Rc::new(crate::util::document::FixedPreference(false)),
    );
    let config = StoreConfig {
        theme_storage_key: "qa-theme".to_owned(),
        dark_mode_class: "is-dark".to_owned(),
        ..StoreConfig::default()
    };
    let store = init_store(&config, &env, Rc::new(DemoAuthenticator)).unwrap();

    store.dispatch(UiAction::SetTheme(Theme::Dark));
    assert_eq!(storage.get_item("qa-theme"), Ok(Some("dark".to_owned())));
    assert_eq!(document.classes(), vec!["is-dark".to_owned()]);
}

#[test]
fn init_store_rejects_invalid_config() {
    let config = StoreConfig { dark_mode_class: String::new(), ..StoreConfig::default() };
    let result = init_store(&config, &Environment::in_memory(), Rc::new(DemoAuthenticator));
    assert!(matches!(result, Err(ConfigError::Empty { field: "darkModeClass" })));
}

#[test]
fn action_log_records_dispatches() {
    let store = init_store(&StoreConfig::default(), &Environment::in_memory(), Rc::new(DemoAuthenticator)).unwrap();
    store.dispatch(UiAction::ToggleSidebar);
    store.dispatch(SessionAction::ResetSession);
    assert_eq!(store.action_log(), vec!["ui/toggleSidebar", "session/resetSession"]);
}

#[test]
fn action_log_disabled_by_zero_capacity() {
    let config = StoreConfig { action_log_capacity: 0, ..StoreConfig::default() };
    let store = init_store(&config, &Environment::in_memory(), Rc::new(DemoAuthenticator)).unwrap();
    store.dispatch(UiAction::ToggleSidebar);
    assert!(store.action_log().is_empty());
}

// =============================================================================
// sign_in
// =============================================================================

#[tokio::test]
async fn sign_in_scenario_pending_then_fulfilled() {
    let store = demo_store();
    let pending = store.sign_in(Credentials::new("a@b.com", "x"));

    let state = store.state();
    assert!(state.user.is_loading);
    assert!(state.user.error.is_none());
    assert_eq!(state.user.sign_in.map(|r| r.phase), Some(SignInPhase::Pending));

    assert_eq!(pending.await, SignInPhase::Succeeded);
    let state = store.state();
    assert!(!state.user.is_loading);
    assert!(state.user.is_authenticated);
    assert_eq!(state.user.current_user.as_ref().map(|u| u.email.as_str()), Some("a@b.com"));
}

#[tokio::test]
async fn sign_in_failure_becomes_error_message() {
    let store = Store::new(Rc::new(FailingAuthenticator(AuthError::Rejected("bad password".to_owned()))));
    store.dispatch(UserAction::SignInRejected { request_id: RequestId(99), message: "old".to_owned() });

    let pending = store.sign_in(Credentials::new("a@b.com", "nope"));
    assert!(store.state().user.error.is_none());

    assert_eq!(pending.await, SignInPhase::Failed);
    let state = store.state();
    assert!(!state.user.is_loading);
    assert!(!state.user.is_authenticated);
    assert_eq!(state.user.error.as_deref(), Some("bad password"));
}

#[tokio::test]
async fn sign_in_failure_without_message_uses_generic_text() {
    let store = Store::new(Rc::new(FailingAuthenticator(AuthError::Rejected(String::new()))));
    store.sign_in(Credentials::new("a@b.com", "x")).await;
    assert_eq!(store.state().user.error.as_deref(), Some("Authentication failed"));
}

#[tokio::test]
async fn store_stays_interactive_while_sign_in_is_suspended() {
    let (tx, rx) = oneshot::channel();
    let store = Store::new(Rc::new(GatedAuthenticator::new(vec![rx])));
    let pending = store.sign_in(Credentials::new("a@b.com", "x"));

    let driver = {
        let store = store.clone();
        async move {
            tokio::task::yield_now().await;
            store.dispatch(UiAction::ToggleSidebar);
            assert!(store.state().user.is_loading);
            tx.send(Ok(user("a@b.com"))).unwrap();
        }
    };
    let (phase, ()) = tokio::join!(pending, driver);

    assert_eq!(phase, SignInPhase::Succeeded);
    let state = store.state();
    assert!(!state.ui.sidebar_open);
    assert!(state.user.is_authenticated);
}

#[tokio::test]
async fn overlapping_sign_ins_last_to_settle_wins() {
    let (tx1, rx1) = oneshot::channel();
    let (tx2, rx2) = oneshot::channel();
    let store = Store::new(Rc::new(GatedAuthenticator::new(vec![rx1, rx2])));

    let first = store.sign_in(Credentials::new("first@x.io", "x"));
    let second = store.sign_in(Credentials::new("second@x.io", "x"));
    assert_eq!(store.state().user.sign_in.map(|r| r.id), Some(RequestId(2)));

    let driver = {
        let store = store.clone();
        async move {
            tx2.send(Ok(user("second@x.io"))).unwrap();
            while store.state().user.current_user.is_none() {
                tokio::task::yield_now().await;
            }
            tx1.send(Err(AuthError::Rejected("late failure".to_owned()))).unwrap();
        }
    };
    let (first_phase, second_phase, ()) = tokio::join!(first, second, driver);

    assert_eq!(first_phase, SignInPhase::Failed);
    assert_eq!(second_phase, SignInPhase::Succeeded);
    let state = store.state();
    assert_eq!(state.user.sign_in, Some(SignInRequest { id: RequestId(1), phase: SignInPhase::Failed }));
    assert_eq!(state.user.error.as_deref(), Some("late failure"));
    assert!(!state.user.is_loading);
    assert_eq!(state.user.current_user.as_ref().map(|u| u.email.as_str()), Some("second@x.io"));
}
