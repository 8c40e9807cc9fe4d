//! Sign-in backend.
//!
//! DESIGN
//! ======
//! [`Authenticator`] is the seam a real identity provider plugs into. The
//! store only relies on the result shape: a [`User`] on success or an
//! [`AuthError`] whose message lands in `UserState::error`.
//!
//! TRADE-OFFS
//! ==========
//! [`DemoAuthenticator`] accepts any credentials. It exists so the sign-in
//! screen and the three-phase lifecycle can be exercised before a provider is
//! wired in.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::state::user::User;
use crate::util::time::now_ms;

/// Message stored when a failure carries no message of its own.
pub const DEFAULT_AUTH_FAILURE: &str = "Authentication failed";

pub const DEMO_USER_ID: &str = "user-1";
pub const DEMO_DISPLAY_NAME: &str = "Demo User";

/// Email + password pair submitted by the sign-in form.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

/// Errors produced by an [`Authenticator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the credentials; the message is shown as-is.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Human-readable message for `UserState::error`.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() { DEFAULT_AUTH_FAILURE.to_owned() } else { message }
    }
}

/// Resolves credentials into a user profile.
///
/// `?Send`: the store is single-threaded and sign-in futures run on the
/// client's local executor.
#[async_trait(?Send)]
pub trait Authenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError>;
}

/// Accepts every sign-in and returns a fixed demo profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoAuthenticator;

#[async_trait(?Send)]
impl Authenticator for DemoAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError> {
        Ok(User {
            id: DEMO_USER_ID.to_owned(),
            email: credentials.email.clone(),
            display_name: DEMO_DISPLAY_NAME.to_owned(),
            avatar_url: None,
            is_online: true,
            last_active: Some(now_ms()),
        })
    }
}
