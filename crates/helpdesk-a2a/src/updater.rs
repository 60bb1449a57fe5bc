// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    A2aError, Artifact, EventQueue, Message, Part, TaskArtifactUpdateEvent, TaskState, TaskStatus,
    TaskStatusUpdateEvent,
};

/// Publishes status and artifact updates for one task.
///
/// Once a final update (or a terminal state) has been published every
/// further update is rejected with [`A2aError::AlreadyFinal`].
pub struct TaskUpdater {
    queue: Arc<EventQueue>,
    task_id: String,
    context_id: String,
    finished: AtomicBool,
}

impl TaskUpdater {
    pub fn new(queue: Arc<EventQueue>, task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            queue,
            task_id: task_id.into(),
            context_id: context_id.into(),
            finished: AtomicBool::new(false),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), A2aError> {
        if self.is_finished() {
            return Err(A2aError::AlreadyFinal { task_id: self.task_id.clone() });
        }
        Ok(())
    }

    /// Publish a status change.  Terminal states are always final.
    pub async fn update_status(
        &self,
        state: TaskState,
        message: Option<Message>,
        is_final: bool,
    ) -> Result<(), A2aError> {
        let is_final = is_final || state.is_terminal();
        // Claim the final slot atomically so two racing finals cannot both pass.
        if is_final {
            if self.finished.swap(true, Ordering::SeqCst) {
                return Err(A2aError::AlreadyFinal { task_id: self.task_id.clone() });
            }
        } else {
            self.ensure_open()?;
        }
        debug!(task = %self.task_id, %state, is_final, "status update");
        self.queue
            .enqueue_event(TaskStatusUpdateEvent {
                task_id: self.task_id.clone(),
                context_id: self.context_id.clone(),
                status: TaskStatus::new(state, message),
                is_final,
            })
            .await
    }

    /// Publish a new artifact with a fresh id.
    pub async fn add_artifact(&self, parts: Vec<Part>, name: Option<&str>) -> Result<(), A2aError> {
        self.ensure_open()?;
        let artifact = Artifact {
            artifact_id: Uuid::new_v4().to_string(),
            name: name.map(str::to_string),
            parts,
        };
        debug!(task = %self.task_id, name = ?artifact.name, "artifact update");
        self.queue
            .enqueue_event(TaskArtifactUpdateEvent {
                task_id: self.task_id.clone(),
                context_id: self.context_id.clone(),
                artifact,
                append: None,
                last_chunk: None,
            })
            .await
    }

    pub async fn complete(&self, message: Option<Message>) -> Result<(), A2aError> {
        self.update_status(TaskState::Completed, message, true).await
    }

    pub async fn failed(&self, message: Option<Message>) -> Result<(), A2aError> {
        self.update_status(TaskState::Failed, message, true).await
    }
}

#[cfg(test)]
mod tests {
    use tokio_stream::StreamExt;

    use super::*;
    use crate::Event;

    fn updater() -> (Arc<EventQueue>, TaskUpdater) {
        let q = Arc::new(EventQueue::new());
        let u = TaskUpdater::new(q.clone(), "t1", "c1");
        (q, u)
    }

    #[tokio::test]
    async fn updates_are_addressed_to_the_task() {
        let (q, u) = updater();
        u.update_status(TaskState::Working, None, false).await.unwrap();
        u.add_artifact(vec![Part::text("hola")], Some("form")).await.unwrap();
        u.complete(None).await.unwrap();
        q.close();

        let events: Vec<Event> = q.receiver().unwrap().collect().await;
        assert_eq!(events.len(), 3);
        match &events[1] {
            Event::ArtifactUpdate(a) => {
                assert_eq!(a.task_id, "t1");
                assert_eq!(a.artifact.name.as_deref(), Some("form"));
            }
            other => panic!("expected artifact, got {other:?}"),
        }
        assert!(events[2].is_final());
        assert!(!events[0].is_final());
    }

    #[tokio::test]
    async fn updates_after_final_are_rejected() {
        let (_q, u) = updater();
        u.failed(None).await.unwrap();
        assert!(u.is_finished());
        let err = u.update_status(TaskState::Working, None, false).await.unwrap_err();
        assert!(matches!(err, A2aError::AlreadyFinal { .. }));
        assert!(u.complete(None).await.is_err());
        assert!(u.add_artifact(vec![], None).await.is_err());
    }

    #[tokio::test]
    async fn terminal_state_is_final_even_without_flag() {
        let (q, u) = updater();
        u.update_status(TaskState::Completed, None, false).await.unwrap();
        q.close();
        let events: Vec<Event> = q.receiver().unwrap().collect().await;
        assert!(events[0].is_final());
        assert!(u.is_finished());
    }
}
