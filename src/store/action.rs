//! The closed set of intents accepted by [`crate::store::Store::dispatch`].

#[cfg(test)]
#[path = "action_test.rs"]
mod action_test;

use serde::{Deserialize, Serialize};

use crate::state::session::SessionAction;
use crate::state::ui::{Theme, UiAction};
use crate::state::user::UserAction;

/// Any slice intent.
///
/// Serializes as the slice action's `{"type", "payload"}` form; the `type`
/// prefix (`ui/`, `session/`, `user/`) selects the slice when parsing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Ui(UiAction),
    Session(SessionAction),
    User(UserAction),
}

impl Action {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Ui(action) => action.type_name(),
            Self::Session(action) => action.type_name(),
            Self::User(action) => action.type_name(),
        }
    }

    /// The new theme, if this intent sets one.
    pub fn theme_change(&self) -> Option<Theme> {
        match self {
            Self::Ui(UiAction::SetTheme(theme)) => Some(*theme),
            _ => None,
        }
    }
}

impl From<UiAction> for Action {
    fn from(action: UiAction) -> Self {
        Self::Ui(action)
    }
}

impl From<SessionAction> for Action {
    fn from(action: SessionAction) -> Self {
        Self::Session(action)
    }
}

impl From<UserAction> for Action {
    fn from(action: UserAction) -> Self {
        Self::User(action)
    }
}
