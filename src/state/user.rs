//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to decide between the
//! sign-in screen and the workspace. The async sign-in flow lives in
//! [`crate::store::Store::sign_in`]; this module only holds the phase
//! transitions it dispatches.
//!
//! DESIGN
//! ======
//! Every sign-in attempt carries a [`RequestId`]. The slice records the
//! phase of the most recently touched request in [`UserState::sign_in`], but
//! does not filter stale completions: when attempts overlap, the last one to
//! settle owns `current_user`, `error`, and `is_loading`.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::time::now_ms;

/// An authenticated user profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_online: bool,
    /// Last activity in milliseconds since the Unix epoch.
    pub last_active: Option<i64>,
}

/// Partial profile fields merged by [`UserAction::UpdateUserProfile`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_online: Option<bool>,
    pub last_active: Option<i64>,
}

impl User {
    fn merge(&mut self, update: &UserProfileUpdate) {
        if let Some(email) = &update.email {
            self.email.clone_from(email);
        }
        if let Some(display_name) = &update.display_name {
            self.display_name.clone_from(display_name);
        }
        if let Some(avatar_url) = &update.avatar_url {
            self.avatar_url = Some(avatar_url.clone());
        }
        if let Some(is_online) = update.is_online {
            self.is_online = is_online;
        }
        if let Some(last_active) = update.last_active {
            self.last_active = Some(last_active);
        }
    }
}

/// Identifier of one sign-in attempt, unique per store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signin-{}", self.0)
    }
}

/// Lifecycle phase of a sign-in attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignInPhase {
    Pending,
    Succeeded,
    Failed,
}

/// The most recently touched sign-in attempt and where it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub id: RequestId,
    pub phase: SignInPhase,
}

/// User slice state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub current_user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_authenticated: bool,
    pub sign_in: Option<SignInRequest>,
}

impl UserState {
    /// Apply one user transition in place.
    pub fn apply(&mut self, action: &UserAction) {
        match action {
            UserAction::SetUser(user) => {
                self.current_user = Some(user.clone());
                self.is_authenticated = true;
                self.error = None;
            }
            UserAction::ClearUser => {
                self.current_user = None;
                self.is_authenticated = false;
            }
            UserAction::UpdateUserProfile(update) => {
                if let Some(user) = self.current_user.as_mut() {
                    user.merge(update);
                }
            }
            UserAction::SetOnlineStatus(online) => {
                if let Some(user) = self.current_user.as_mut() {
                    user.is_online = *online;
                    user.last_active = Some(now_ms());
                }
            }
            UserAction::SignInPending { request_id } => {
                self.is_loading = true;
                self.error = None;
                self.sign_in = Some(SignInRequest { id: *request_id, phase: SignInPhase::Pending });
            }
            UserAction::SignInFulfilled { request_id, user } => {
                self.is_loading = false;
                self.current_user = Some(user.clone());
                self.is_authenticated = true;
                self.sign_in = Some(SignInRequest { id: *request_id, phase: SignInPhase::Succeeded });
            }
            UserAction::SignInRejected { request_id, message } => {
                self.is_loading = false;
                self.error = Some(message.clone());
                self.sign_in = Some(SignInRequest { id: *request_id, phase: SignInPhase::Failed });
            }
        }
    }
}

/// Intents handled by the user slice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum UserAction {
    #[serde(rename = "user/setUser")]
    SetUser(User),
    #[serde(rename = "user/clearUser")]
    ClearUser,
    #[serde(rename = "user/updateUserProfile")]
    UpdateUserProfile(UserProfileUpdate),
    #[serde(rename = "user/setOnlineStatus")]
    SetOnlineStatus(bool),
    #[serde(rename = "user/signIn/pending", rename_all = "camelCase")]
    SignInPending { request_id: RequestId },
    #[serde(rename = "user/signIn/fulfilled", rename_all = "camelCase")]
    SignInFulfilled { request_id: RequestId, user: User },
    #[serde(rename = "user/signIn/rejected", rename_all = "camelCase")]
    SignInRejected { request_id: RequestId, message: String },
}

impl UserAction {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "user/setUser",
            Self::ClearUser => "user/clearUser",
            Self::UpdateUserProfile(_) => "user/updateUserProfile",
            Self::SetOnlineStatus(_) => "user/setOnlineStatus",
            Self::SignInPending { .. } => "user/signIn/pending",
            Self::SignInFulfilled { .. } => "user/signIn/fulfilled",
            Self::SignInRejected { .. } => "user/signIn/rejected",
        }
    }
}
