// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use anyhow::anyhow;
use futures::{Stream, StreamExt};
use helpdesk_config::Config;
use helpdesk_core::{FinalContent, LlmAgent, Runner, RunnerEvent};
use helpdesk_model::ModelProvider;
use helpdesk_tools::RequestIdLog;
use serde_json::Value;
use tracing::debug;

use crate::AgentKind;

/// User id every conversation is recorded under.
pub const USER_ID: &str = "remote_agent";

/// The final answer of a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamContent {
    /// Text written by the model
    Text(String),
    /// A structured tool response returned without summarisation
    Data(Value),
}

/// One step of the two-state progress protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    Working { updates: String },
    Complete { content: StreamContent },
}

impl StreamItem {
    pub fn is_task_complete(&self) -> bool {
        matches!(self, StreamItem::Complete { .. })
    }
}

/// One help-desk agent bound to a model and its data file.
pub struct DomainAgent {
    kind: AgentKind,
    runner: Runner,
}

impl DomainAgent {
    pub fn new(kind: AgentKind, model: Arc<dyn ModelProvider>, cfg: &Config, log: Arc<RequestIdLog>) -> Self {
        let p = kind.profile();
        let agent = LlmAgent::new(p.name, p.description, p.instruction, kind.tools(&cfg.data, log))
            .with_skip_summarization(cfg.agent.skip_summarization)
            .with_max_tool_rounds(cfg.agent.max_tool_rounds);
        Self { kind, runner: Runner::new(agent, model) }
    }

    /// Build the agent with the configured model provider and the
    /// process-wide request-id log.
    pub fn from_config(kind: AgentKind, cfg: &Config) -> anyhow::Result<Self> {
        let model: Arc<dyn ModelProvider> = Arc::from(helpdesk_model::from_config(&cfg.model)?);
        Ok(Self::new(kind, model, cfg, RequestIdLog::global()))
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.runner.app_name()
    }

    pub fn processing_message(&self) -> &'static str {
        self.kind.profile().processing_message
    }

    /// Run `query` in the session `session_id`, creating the session on
    /// first use, and relay progress.
    ///
    /// A `Working` item is yielded as soon as the run starts and again for
    /// every intermediate runner event; the final runner event becomes the
    /// single `Complete` item.  A runner error ends the stream with `Err`.
    pub fn stream<'a>(
        &'a self,
        query: &'a str,
        session_id: &'a str,
    ) -> impl Stream<Item = anyhow::Result<StreamItem>> + Send + 'a {
        async_stream::try_stream! {
            self.runner
                .session_service()
                .get_or_create(self.name(), USER_ID, session_id)?;

            debug!(agent = %self.name(), session = %session_id, "starting run");
            let mut events = self.runner.run(USER_ID, session_id, query);
            let updates = self.processing_message().to_string();
            yield StreamItem::Working { updates: updates.clone() };

            while let Some(event) = events.next().await {
                match event {
                    RunnerEvent::Final(FinalContent::Text(text)) => {
                        yield StreamItem::Complete { content: StreamContent::Text(text) };
                    }
                    RunnerEvent::Final(FinalContent::FunctionResponse { response, .. }) => {
                        yield StreamItem::Complete { content: StreamContent::Data(response) };
                    }
                    RunnerEvent::Error(e) => {
                        Err::<(), _>(anyhow!(e))?;
                    }
                    RunnerEvent::ToolCallRequested(_) | RunnerEvent::ToolResponse { .. } => {
                        yield StreamItem::Working { updates: updates.clone() };
                    }
                }
            }
        }
    }
}
