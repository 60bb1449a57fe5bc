// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use helpdesk_a2a::{
    new_agent_text_message, new_task, A2aError, AgentCard, AgentExecutor, EventQueue, Part,
    RequestContext, Task, TaskState, TaskUpdater,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{CompletionDispatch, DomainAgent, StreamContent, StreamItem};

/// Serves task-protocol requests with a [`DomainAgent`].
///
/// Every execution publishes the task (when new), a working update per
/// stream step and exactly one final status update.
pub struct DomainExecutor {
    agent: DomainAgent,
}

impl DomainExecutor {
    pub fn new(agent: DomainAgent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &DomainAgent {
        &self.agent
    }

    pub fn card(&self, url: Option<&str>) -> AgentCard {
        self.agent.kind().card(url)
    }

    async fn finish(&self, updater: &TaskUpdater, task: &Task, content: StreamContent) -> Result<(), A2aError> {
        let reply = |text: String| new_agent_text_message(text, Some(&task.context_id), Some(&task.id));
        match content {
            StreamContent::Data(value) => {
                let Some(message) = value.get("message") else {
                    warn!(task = %task.id, "structured response without a message field");
                    let text = format!("Formato de respuesta inesperado: {value}");
                    return updater.update_status(TaskState::Failed, Some(reply(text)), true).await;
                };
                let text = match message {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if let CompletionDispatch::WithDataArtifact { artifact, list_key, wrapper_key } =
                    self.agent.kind().profile().completion
                {
                    let list = value.get(list_key).and_then(Value::as_array).filter(|l| !l.is_empty());
                    if let Some(list) = list {
                        debug!(task = %task.id, count = list.len(), artifact, "publishing data artifact");
                        let data = json!({ wrapper_key: list });
                        updater.add_artifact(vec![Part::data(data)], Some(artifact)).await?;
                    }
                }
                updater.update_status(TaskState::Completed, Some(reply(text)), true).await
            }
            StreamContent::Text(text) => {
                updater.add_artifact(vec![Part::text(text)], Some("form")).await?;
                updater.complete(None).await
            }
        }
    }
}

#[async_trait]
impl AgentExecutor for DomainExecutor {
    async fn execute(&self, context: RequestContext, queue: Arc<EventQueue>) -> Result<(), A2aError> {
        let query = context.get_user_input();
        let task = match context.current_task.clone() {
            Some(task) => task,
            None => {
                let task = new_task(&context.message)?;
                queue.enqueue_event(task.clone()).await?;
                task
            }
        };
        let updater = TaskUpdater::new(queue, &task.id, &task.context_id);
        let reply = |text: String| new_agent_text_message(text, Some(&task.context_id), Some(&task.id));

        let mut stream = Box::pin(self.agent.stream(&query, &task.context_id));
        while let Some(item) = stream.next().await {
            match item {
                Ok(StreamItem::Working { updates }) => {
                    updater.update_status(TaskState::Working, Some(reply(updates)), false).await?;
                }
                Ok(StreamItem::Complete { content }) => {
                    self.finish(&updater, &task, content).await?;
                    break;
                }
                Err(e) => {
                    warn!(task = %task.id, error = %e, "agent stream failed");
                    updater
                        .update_status(TaskState::Failed, Some(reply(format!("{e:#}"))), true)
                        .await?;
                    break;
                }
            }
        }

        if !updater.is_finished() {
            let text = "El agente terminó sin producir una respuesta.".to_string();
            updater.failed(Some(reply(text))).await?;
        }
        Ok(())
    }

    async fn cancel(&self, _context: RequestContext, _queue: Arc<EventQueue>) -> Result<Option<Task>, A2aError> {
        Err(A2aError::UnsupportedOperation)
    }
}
