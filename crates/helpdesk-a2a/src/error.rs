// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

/// Errors surfaced by executors and the task-protocol plumbing.
#[derive(Debug, Error)]
pub enum A2aError {
    #[error("This operation is not supported")]
    UnsupportedOperation,
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("event queue is closed")]
    QueueClosed,
    #[error("task {task_id} is already in a terminal state")]
    AlreadyFinal { task_id: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl A2aError {
    /// JSON-RPC error code used by task-protocol servers for this error.
    pub fn code(&self) -> i32 {
        match self {
            A2aError::UnsupportedOperation => -32004,
            A2aError::InvalidParams(_) => -32602,
            A2aError::QueueClosed | A2aError::AlreadyFinal { .. } | A2aError::Internal(_) => -32603,
        }
    }
}
