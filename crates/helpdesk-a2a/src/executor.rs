// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::{A2aError, Event, EventQueue, RequestContext, Task};

/// The seam between a task-protocol server and an agent.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Serve one request, publishing progress on `queue`.
    async fn execute(&self, context: RequestContext, queue: Arc<EventQueue>) -> Result<(), A2aError>;

    /// Cancel the task the request refers to.
    async fn cancel(&self, context: RequestContext, queue: Arc<EventQueue>) -> Result<Option<Task>, A2aError>;
}

/// A running execution: its live event stream and the executor's result.
pub struct Execution {
    pub events: UnboundedReceiverStream<Event>,
    pub handle: JoinHandle<Result<(), A2aError>>,
}

impl Execution {
    /// Drain every event, then return them with the folded task snapshot.
    pub async fn collect(mut self) -> Result<(Vec<Event>, Option<Task>), A2aError> {
        let mut events = Vec::new();
        while let Some(ev) = self.events.next().await {
            events.push(ev);
        }
        self.handle
            .await
            .map_err(|e| A2aError::Internal(format!("executor task failed: {e}")))??;
        let task = fold_task(&events);
        Ok((events, task))
    }
}

/// Run `executor` in the background.  The queue is closed when the executor
/// returns, so the event stream always terminates.
pub fn spawn_execution(executor: Arc<dyn AgentExecutor>, context: RequestContext) -> Execution {
    let (queue, events) = EventQueue::channel();
    let queue = Arc::new(queue);
    let handle = tokio::spawn(async move {
        let result = executor.execute(context, queue.clone()).await;
        if let Err(e) = &result {
            warn!(error = %e, "executor returned an error");
        }
        queue.close();
        result
    });
    Execution { events, handle }
}

/// Replay events into a task snapshot, starting from the first task event.
pub fn fold_task(events: &[Event]) -> Option<Task> {
    let mut task: Option<Task> = None;
    for ev in events {
        if let Some(t) = task.as_mut() {
            t.apply(ev);
        } else if let Event::Task(t) = ev {
            task = Some(t.clone());
        }
    }
    task
}
