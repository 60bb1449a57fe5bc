// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use uuid::Uuid;

use crate::{A2aError, Message, Part, Role, Task, TaskState, TaskStatus};

/// Create a submitted task for an incoming user message.
///
/// The task reuses the message's context id when it has one.  A message
/// without parts is rejected.
pub fn new_task(message: &Message) -> Result<Task, A2aError> {
    if message.parts.is_empty() {
        return Err(A2aError::InvalidParams("message parts cannot be empty".into()));
    }
    let context_id = message
        .context_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    Ok(Task {
        id: message.task_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
        context_id,
        status: TaskStatus::new(TaskState::Submitted, None),
        history: vec![message.clone()],
        artifacts: Vec::new(),
    })
}

pub fn new_agent_text_message(text: impl Into<String>, context_id: Option<&str>, task_id: Option<&str>) -> Message {
    new_agent_parts_message(vec![Part::text(text)], context_id, task_id)
}

pub fn new_agent_parts_message(parts: Vec<Part>, context_id: Option<&str>, task_id: Option<&str>) -> Message {
    Message {
        role: Role::Agent,
        parts,
        message_id: Uuid::new_v4().to_string(),
        context_id: context_id.map(str::to_string),
        task_id: task_id.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_task_keeps_context_and_history() {
        let mut msg = Message::user_text("¿dónde está mi pedido?");
        msg.context_id = Some("ctx-1".into());
        let task = new_task(&msg).unwrap();
        assert_eq!(task.context_id, "ctx-1");
        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.history, vec![msg]);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn new_task_generates_context_when_absent() {
        let task = new_task(&Message::user_text("hola")).unwrap();
        assert!(Uuid::parse_str(&task.context_id).is_ok());
    }

    #[test]
    fn new_task_rejects_empty_message() {
        let mut msg = Message::user_text("x");
        msg.parts.clear();
        assert!(matches!(new_task(&msg), Err(A2aError::InvalidParams(_))));
    }

    #[test]
    fn agent_messages_are_addressed() {
        let m = new_agent_text_message("listo", Some("c"), Some("t"));
        assert_eq!(m.role, Role::Agent);
        assert_eq!(m.context_id.as_deref(), Some("c"));
        assert_eq!(m.task_id.as_deref(), Some("t"));
        assert_eq!(m.text(""), "listo");

        let m = new_agent_parts_message(vec![Part::data(json!({ "a": 1 }))], None, None);
        assert_eq!(m.text(""), "");
        assert_ne!(m.message_id, new_agent_text_message("x", None, None).message_id);
    }
}
