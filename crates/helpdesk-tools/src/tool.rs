// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::{json, Value};

/// A single tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Opaque identifier returned by the model (forwarded verbatim)
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments
    pub args: Value,
}

/// The result of executing a tool.
///
/// `response` is the structured object handed back to the model.  Lookup
/// tools report their own failures inside a normally shaped response, so
/// `is_error` is reserved for calls that never reached the tool body
/// (unknown tool, malformed arguments, panicked task).
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub call_id: String,
    pub response: Value,
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful structured result.
    pub fn ok(call_id: impl Into<String>, response: Value) -> Self {
        Self { call_id: call_id.into(), response, is_error: false }
    }

    /// Error result; the message is wrapped as `{"error": msg}`.
    pub fn err(call_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            response: json!({ "error": msg.into() }),
            is_error: true,
        }
    }
}

/// Trait that every lookup tool implements.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for parameters
    fn parameters_schema(&self) -> Value;
    /// Execute the tool.  Errors should be wrapped in [`ToolOutput::err`].
    async fn execute(&self, call: &ToolCall) -> ToolOutput;
}

/// Read an optional string argument.  Numbers are accepted in their decimal
/// form and an empty string counts as absent.
pub(crate) fn optional_str_arg(args: &Value, key: &str) -> Option<String> {
    let raw = match args.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}
