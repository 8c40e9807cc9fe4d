//! In-progress QA session: identifiers, target URLs, participants, viewport.
//!
//! DESIGN
//! ======
//! The slice mirrors what a reviewer sees in the collaboration workspace.
//! Participant edits addressed to an unknown id are silent no-ops; only
//! [`SessionAction::ResetSession`] returns the slice to its initial value.
//!
//! TRADE-OFFS
//! ==========
//! `StartSession` overwrites whatever session was in progress and
//! `EndSession` keeps `started_at`. Callers that need continuity reset or end
//! the session first.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::util::time::now_ms;

pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 800;
pub const DEFAULT_DEVICE_NAME: &str = "Desktop";

/// A 2D point in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Access level of a session participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Owner,
    Editor,
    Viewer,
}

/// A user present in the current session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub role: ParticipantRole,
    pub is_active: bool,
    /// Last reported cursor position, if the participant has moved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_position: Option<Point>,
}

/// Partial participant fields merged by [`SessionAction::UpdateParticipant`].
///
/// The participant id is the map key and cannot be changed here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticipantUpdate {
    pub name: Option<String>,
    pub role: Option<ParticipantRole>,
    pub is_active: Option<bool>,
    pub cursor_position: Option<Point>,
}

impl Participant {
    fn merge(&mut self, updates: &ParticipantUpdate) {
        if let Some(name) = &updates.name {
            self.name.clone_from(name);
        }
        if let Some(role) = updates.role {
            self.role = role;
        }
        if let Some(is_active) = updates.is_active {
            self.is_active = is_active;
        }
        if let Some(position) = updates.cursor_position {
            self.cursor_position = Some(position);
        }
    }
}

/// Emulated viewport the target page is rendered into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
    pub device_name: String,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self { width: DEFAULT_VIEWPORT_WIDTH, height: DEFAULT_VIEWPORT_HEIGHT, device_name: DEFAULT_DEVICE_NAME.to_owned() }
    }
}

/// Payload of [`SessionAction::StartSession`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    pub id: String,
    pub project_id: String,
    pub target_url: String,
    #[serde(default)]
    pub figma_url: Option<String>,
}

impl StartSession {
    /// Start payload with a freshly generated session id.
    pub fn new(project_id: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            target_url: target_url.into(),
            figma_url: None,
        }
    }

    #[must_use]
    pub fn with_figma_url(mut self, figma_url: impl Into<String>) -> Self {
        self.figma_url = Some(figma_url.into());
        self
    }
}

/// Session slice state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub target_url: Option<String>,
    pub figma_url: Option<String>,
    pub participants: BTreeMap<String, Participant>,
    pub is_active: bool,
    /// Start time in milliseconds since the Unix epoch.
    pub started_at: Option<i64>,
    pub viewport_size: ViewportSize,
}

impl SessionState {
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Apply one session transition in place.
    pub fn apply(&mut self, action: &SessionAction) {
        match action {
            SessionAction::StartSession(start) => {
                self.id = Some(start.id.clone());
                self.project_id = Some(start.project_id.clone());
                self.target_url = Some(start.target_url.clone());
                self.figma_url = start.figma_url.clone().filter(|url| !url.is_empty());
                self.is_active = true;
                self.started_at = Some(now_ms());
                info!(session_id = %start.id, project_id = %start.project_id, "session started");
            }
            SessionAction::EndSession => {
                self.is_active = false;
                info!(session_id = ?self.id, "session ended");
            }
            SessionAction::ResetSession => *self = Self::default(),
            SessionAction::UpdateViewportSize(size) => self.viewport_size = size.clone(),
            SessionAction::AddParticipant(participant) => {
                self.participants.insert(participant.id.clone(), participant.clone());
            }
            SessionAction::RemoveParticipant(id) => {
                self.participants.remove(id);
            }
            SessionAction::UpdateParticipant { id, updates } => {
                if let Some(participant) = self.participants.get_mut(id) {
                    participant.merge(updates);
                }
            }
            SessionAction::UpdateCursorPosition { participant_id, position } => {
                if let Some(participant) = self.participants.get_mut(participant_id) {
                    participant.cursor_position = Some(*position);
                }
            }
        }
    }
}

/// Intents handled by the session slice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SessionAction {
    #[serde(rename = "session/startSession")]
    StartSession(StartSession),
    #[serde(rename = "session/endSession")]
    EndSession,
    #[serde(rename = "session/resetSession")]
    ResetSession,
    #[serde(rename = "session/updateViewportSize")]
    UpdateViewportSize(ViewportSize),
    #[serde(rename = "session/addParticipant")]
    AddParticipant(Participant),
    #[serde(rename = "session/removeParticipant")]
    RemoveParticipant(String),
    #[serde(rename = "session/updateParticipant")]
    UpdateParticipant { id: String, updates: ParticipantUpdate },
    #[serde(rename = "session/updateCursorPosition", rename_all = "camelCase")]
    UpdateCursorPosition { participant_id: String, position: Point },
}

impl SessionAction {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::StartSession(_) => "session/startSession",
            Self::EndSession => "session/endSession",
            Self::ResetSession => "session/resetSession",
            Self::UpdateViewportSize(_) => "session/updateViewportSize",
            Self::AddParticipant(_) => "session/addParticipant",
            Self::RemoveParticipant(_) => "session/removeParticipant",
            Self::UpdateParticipant { .. } => "session/updateParticipant",
            Self::UpdateCursorPosition { .. } => "session/updateCursorPosition",
        }
    }
}
