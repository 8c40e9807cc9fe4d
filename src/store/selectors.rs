//! Pure read projections over [`RootState`].
//!
//! Pass these to [`crate::store::Store::select`] for owned values, or call
//! them directly on a [`crate::store::Store::state`] snapshot to borrow.

#[cfg(test)]
#[path = "selectors_test.rs"]
mod selectors_test;

use std::collections::BTreeMap;

use super::RootState;
use crate::state::session::{Participant, ViewportSize};
use crate::state::ui::Theme;
use crate::state::user::{SignInRequest, User};

// =============================================================================
// UI
// =============================================================================

pub fn theme(state: &RootState) -> Theme {
    state.ui.theme
}

pub fn sidebar_open(state: &RootState) -> bool {
    state.ui.sidebar_open
}

pub fn active_tool(state: &RootState) -> Option<&str> {
    state.ui.active_tool_id.as_deref()
}

/// Absent modal ids read as closed.
pub fn modal_open(state: &RootState, modal_id: &str) -> bool {
    state.ui.is_modal_open(modal_id)
}

// =============================================================================
// SESSION
// =============================================================================

pub fn session_id(state: &RootState) -> Option<&str> {
    state.session.id.as_deref()
}

pub fn is_session_active(state: &RootState) -> bool {
    state.session.is_active
}

pub fn target_url(state: &RootState) -> Option<&str> {
    state.session.target_url.as_deref()
}

pub fn figma_url(state: &RootState) -> Option<&str> {
    state.session.figma_url.as_deref()
}

pub fn viewport_size(state: &RootState) -> &ViewportSize {
    &state.session.viewport_size
}

pub fn participants(state: &RootState) -> &BTreeMap<String, Participant> {
    &state.session.participants
}

pub fn participant_by_id<'a>(state: &'a RootState, id: &str) -> Option<&'a Participant> {
    state.session.participant(id)
}

// =============================================================================
// USER
// =============================================================================

pub fn current_user(state: &RootState) -> Option<&User> {
    state.user.current_user.as_ref()
}

pub fn is_authenticated(state: &RootState) -> bool {
    state.user.is_authenticated
}

pub fn is_user_loading(state: &RootState) -> bool {
    state.user.is_loading
}

pub fn user_error(state: &RootState) -> Option<&str> {
    state.user.error.as_deref()
}

pub fn sign_in_request(state: &RootState) -> Option<SignInRequest> {
    state.user.sign_in
}
