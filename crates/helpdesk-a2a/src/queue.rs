// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::trace;

use crate::{A2aError, Event};

/// Ordered channel from an executor to whoever consumes its events.
///
/// The receiving end can be taken once.  After [`close`](Self::close) new
/// events are rejected and the receiver ends once it has drained what was
/// already queued.
pub struct EventQueue {
    tx: Mutex<Option<mpsc::UnboundedSender<Event>>>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Event>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx: Mutex::new(Some(tx)), rx: Mutex::new(Some(rx)) }
    }

    /// A queue whose receiving end is handed out directly.
    pub fn channel() -> (Self, UnboundedReceiverStream<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queue = Self { tx: Mutex::new(Some(tx)), rx: Mutex::new(None) };
        (queue, UnboundedReceiverStream::new(rx))
    }

    pub async fn enqueue_event(&self, event: impl Into<Event>) -> Result<(), A2aError> {
        let event = event.into();
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .ok_or(A2aError::QueueClosed)?;
        trace!(?event, "enqueue event");
        tx.send(event).map_err(|_| A2aError::QueueClosed)
    }

    pub fn close(&self) {
        self.tx.lock().unwrap_or_else(|p| p.into_inner()).take();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().unwrap_or_else(|p| p.into_inner()).is_none()
    }

    /// Take the receiving end.  Returns `None` once it has been taken.
    pub fn receiver(&self) -> Option<UnboundedReceiverStream<Event>> {
        self.rx
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
            .map(UnboundedReceiverStream::new)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
