//! Local UI chrome state (theme, sidebar, active tool, modals).
//!
//! DESIGN
//! ======
//! Keeps transient presentation concerns out of domain state (`session`,
//! `user`). Every transition is synchronous and total: there is no input a
//! [`UiAction`] can carry that fails to apply.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual theme. Persisted as the lowercase strings `"light"` / `"dark"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Storage representation of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// The opposite theme, as used by the theme toggle button.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a persisted or user-supplied string is not a known theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}` (expected `light` or `dark`)")]
pub struct ThemeParseError(pub String);

impl FromStr for Theme {
    type Err = ThemeParseError;

    /// Exact, case-sensitive match. Anything else is treated as malformed.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_owned())),
        }
    }
}

/// UI state for theme, sidebar, active tool, and modal visibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub theme: Theme,
    pub sidebar_open: bool,
    pub active_tool_id: Option<String>,
    /// Modal id -> visibility. Keys appear on first open/close/toggle.
    pub modals: BTreeMap<String, bool>,
}

impl Default for UiState {
    fn default() -> Self {
        Self { theme: Theme::Light, sidebar_open: true, active_tool_id: None, modals: BTreeMap::new() }
    }
}

impl UiState {
    /// Visibility of `id`; a modal never touched reads as closed.
    pub fn is_modal_open(&self, id: &str) -> bool {
        self.modals.get(id).copied().unwrap_or(false)
    }

    /// Apply one UI transition in place.
    pub fn apply(&mut self, action: &UiAction) {
        match action {
            UiAction::SetTheme(theme) => self.theme = *theme,
            UiAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            UiAction::SetSidebarOpen(open) => self.sidebar_open = *open,
            UiAction::SetActiveTool(tool) => self.active_tool_id.clone_from(tool),
            UiAction::OpenModal(id) => {
                self.modals.insert(id.clone(), true);
            }
            UiAction::CloseModal(id) => {
                self.modals.insert(id.clone(), false);
            }
            UiAction::ToggleModal(id) => {
                let open = self.is_modal_open(id);
                self.modals.insert(id.clone(), !open);
            }
        }
    }
}

/// Intents handled by the UI slice.
///
/// Serialized in the `{"type": "ui/...", "payload": ...}` action form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum UiAction {
    #[serde(rename = "ui/setTheme")]
    SetTheme(Theme),
    #[serde(rename = "ui/toggleSidebar")]
    ToggleSidebar,
    #[serde(rename = "ui/setSidebarOpen")]
    SetSidebarOpen(bool),
    #[serde(rename = "ui/setActiveTool")]
    SetActiveTool(Option<String>),
    #[serde(rename = "ui/openModal")]
    OpenModal(String),
    #[serde(rename = "ui/closeModal")]
    CloseModal(String),
    #[serde(rename = "ui/toggleModal")]
    ToggleModal(String),
}

impl UiAction {
    /// Action type name, matching the serialized `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SetTheme(_) => "ui/setTheme",
            Self::ToggleSidebar => "ui/toggleSidebar",
            Self::SetSidebarOpen(_) => "ui/setSidebarOpen",
            Self::SetActiveTool(_) => "ui/setActiveTool",
            Self::OpenModal(_) => "ui/openModal",
            Self::CloseModal(_) => "ui/closeModal",
            Self::ToggleModal(_) => "ui/toggleModal",
        }
    }
}
