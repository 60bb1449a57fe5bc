// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use helpdesk_tools::ToolCall;
use serde_json::Value;

/// The answer that ends a successful run.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalContent {
    /// Joined text of the model's last turn
    Text(String),
    /// A raw tool response, returned as-is when summarisation is skipped
    FunctionResponse { name: String, response: Value },
}

/// Events emitted by the runner during one invocation.
#[derive(Debug, Clone)]
pub enum RunnerEvent {
    /// The model requested a tool call
    ToolCallRequested(ToolCall),
    /// A tool call finished
    ToolResponse {
        call_id: String,
        tool_name: String,
        response: Value,
        is_error: bool,
    },
    /// The final response; always the last event of a successful run
    Final(FinalContent),
    /// The run failed; no further events follow
    Error(String),
}

impl RunnerEvent {
    pub fn is_final_response(&self) -> bool {
        matches!(self, RunnerEvent::Final(_))
    }
}
