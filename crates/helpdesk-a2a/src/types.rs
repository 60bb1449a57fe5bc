// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Task-protocol data model.
//!
//! Field names are camelCase on the wire and polymorphic values carry a
//! `kind` discriminator, so a serialised [`Event`] can be handed to any
//! agent-to-agent client unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ── Task state ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Rejected,
    AuthRequired,
    Unknown,
}

impl TaskState {
    /// States a task never leaves.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed | TaskState::Rejected
        )
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
            TaskState::Rejected => "rejected",
            TaskState::AuthRequired => "auth-required",
            TaskState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A single content block of a message or artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Data { data: Value },
}

impl Part {
    pub fn text(s: impl Into<String>) -> Self {
        Part::Text { text: s.into() }
    }

    pub fn data(v: Value) -> Self {
        Part::Data { data: v }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::Data { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl Message {
    /// A user message with a single text part and a fresh id.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
            message_id: uuid::Uuid::new_v4().to_string(),
            context_id: None,
            task_id: None,
        }
    }

    /// Text parts joined with `delimiter`; data parts are skipped.
    pub fn text(&self, delimiter: &str) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    pub fn new(state: TaskState, message: Option<Message>) -> Self {
        Self { state, message, timestamp: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Task {
    /// Fold an event into this task snapshot.
    ///
    /// Status updates move the previous status message into the history;
    /// artifact updates replace an artifact with the same id, or extend it
    /// when `append` is set.  Events addressed to another task are ignored.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Task(t) => *self = t.clone(),
            Event::Message(m) => {
                if m.task_id.as_deref().map_or(true, |id| id == self.id) {
                    self.history.push(m.clone());
                }
            }
            Event::StatusUpdate(u) => {
                if u.task_id != self.id {
                    debug!(task = %self.id, other = %u.task_id, "ignoring foreign status update");
                    return;
                }
                if let Some(prev) = self.status.message.take() {
                    self.history.push(prev);
                }
                self.status = u.status.clone();
            }
            Event::ArtifactUpdate(u) => {
                if u.task_id != self.id {
                    debug!(task = %self.id, other = %u.task_id, "ignoring foreign artifact update");
                    return;
                }
                let existing = self
                    .artifacts
                    .iter_mut()
                    .find(|a| a.artifact_id == u.artifact.artifact_id);
                match (existing, u.append.unwrap_or(false)) {
                    (Some(a), true) => a.parts.extend(u.artifact.parts.iter().cloned()),
                    (Some(a), false) => *a = u.artifact.clone(),
                    (None, _) => self.artifacts.push(u.artifact.clone()),
                }
            }
        }
    }

    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name.as_deref() == Some(name))
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub artifact: Artifact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,
}

/// Anything an executor may put on its event queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Event {
    #[serde(rename = "task")]
    Task(Task),
    #[serde(rename = "message")]
    Message(Message),
    #[serde(rename = "status-update")]
    StatusUpdate(TaskStatusUpdateEvent),
    #[serde(rename = "artifact-update")]
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

impl Event {
    /// True for a status update flagged final.
    pub fn is_final(&self) -> bool {
        matches!(self, Event::StatusUpdate(u) if u.is_final)
    }
}

impl From<Task> for Event {
    fn from(t: Task) -> Self {
        Event::Task(t)
    }
}

impl From<Message> for Event {
    fn from(m: Message) -> Self {
        Event::Message(m)
    }
}

impl From<TaskStatusUpdateEvent> for Event {
    fn from(u: TaskStatusUpdateEvent) -> Self {
        Event::StatusUpdate(u)
    }
}

impl From<TaskArtifactUpdateEvent> for Event {
    fn from(u: TaskArtifactUpdateEvent) -> Self {
        Event::ArtifactUpdate(u)
    }
}
