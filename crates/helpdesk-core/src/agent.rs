// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use helpdesk_model::{Message, ToolSchema};
use helpdesk_tools::ToolRegistry;

/// Default bound on model ↔ tool rounds per invocation.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 8;

/// A model-driven agent: instruction, tool set and summarisation policy.
///
/// The agent itself is immutable; all per-conversation state lives in the
/// [`Session`](crate::Session) the [`Runner`](crate::Runner) drives it with.
#[derive(Clone)]
pub struct LlmAgent {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub tools: Arc<ToolRegistry>,
    /// When set, the first tool response of a round is the final answer and
    /// is not handed back to the model for a written reply.
    pub skip_summarization: bool,
    pub max_tool_rounds: u32,
}

impl LlmAgent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
            tools: Arc::new(tools),
            skip_summarization: false,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_skip_summarization(mut self, skip: bool) -> Self {
        self.skip_summarization = skip;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub(crate) fn system_message(&self) -> Message {
        Message::system(self.instruction.trim())
    }

    pub(crate) fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .schemas()
            .into_iter()
            .map(|s| ToolSchema {
                name: s.name,
                description: s.description,
                parameters: s.parameters,
            })
            .collect()
    }
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.name)
            .field("tools", &self.tools.names())
            .field("skip_summarization", &self.skip_summarization)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}
