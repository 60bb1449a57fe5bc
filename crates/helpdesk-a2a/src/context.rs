// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::{Message, Task};

/// Everything an executor knows about the request it is serving.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub message: Message,
    /// The task this message continues, if any
    pub current_task: Option<Task>,
}

impl RequestContext {
    pub fn new(message: Message, current_task: Option<Task>) -> Self {
        Self { message, current_task }
    }

    /// Text parts of the request message, newline-joined.
    pub fn get_user_input(&self) -> String {
        self.message.text("\n")
    }

    pub fn task_id(&self) -> Option<&str> {
        self.current_task
            .as_ref()
            .map(|t| t.id.as_str())
            .or(self.message.task_id.as_deref())
    }

    pub fn context_id(&self) -> Option<&str> {
        self.current_task
            .as_ref()
            .map(|t| t.context_id.as_str())
            .or(self.message.context_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Part;

    #[test]
    fn user_input_joins_text_parts_only() {
        let mut msg = Message::user_text("línea uno");
        msg.parts.push(Part::data(json!({ "ignored": true })));
        msg.parts.push(Part::text("línea dos"));
        let ctx = RequestContext::new(msg, None);
        assert_eq!(ctx.get_user_input(), "línea uno\nlínea dos");
    }

    #[test]
    fn ids_prefer_current_task() {
        let mut msg = Message::user_text("x");
        msg.context_id = Some("from-message".into());
        let ctx = RequestContext::new(msg.clone(), None);
        assert_eq!(ctx.context_id(), Some("from-message"));
        assert_eq!(ctx.task_id(), None);

        let mut task = crate::new_task(&msg).unwrap();
        task.context_id = "from-task".into();
        let ctx = RequestContext::new(msg, Some(task));
        assert_eq!(ctx.context_id(), Some("from-task"));
        assert!(ctx.task_id().is_some());
    }
}
