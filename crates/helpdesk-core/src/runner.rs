// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Context};
use futures::StreamExt;
use helpdesk_model::{CompletionRequest, Message, ModelProvider, ResponseEvent};
use helpdesk_tools::{ToolCall, ToolOutput};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{FinalContent, InMemorySessionService, LlmAgent, RunnerEvent, Session};

/// Stream of events for one invocation.  Ends after a final or error event.
pub type RunnerStream = ReceiverStream<RunnerEvent>;

/// Drives an [`LlmAgent`] against a model, persisting history in sessions.
pub struct Runner {
    app_name: String,
    agent: Arc<LlmAgent>,
    model: Arc<dyn ModelProvider>,
    sessions: Arc<InMemorySessionService>,
}

impl Runner {
    /// The app name defaults to the agent name.
    pub fn new(agent: LlmAgent, model: Arc<dyn ModelProvider>) -> Self {
        Self {
            app_name: agent.name.clone(),
            agent: Arc::new(agent),
            model,
            sessions: Arc::new(InMemorySessionService::new()),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn agent(&self) -> &LlmAgent {
        &self.agent
    }

    pub fn session_service(&self) -> &Arc<InMemorySessionService> {
        &self.sessions
    }

    /// Append `new_message` to the session and run the agent loop in a
    /// background task.  The session must already exist.
    pub fn run(&self, user_id: &str, session_id: &str, new_message: &str) -> RunnerStream {
        let (tx, rx) = mpsc::channel(64);
        let invocation = Invocation {
            app_name: self.app_name.clone(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            new_message: new_message.to_string(),
            agent: self.agent.clone(),
            model: self.model.clone(),
            sessions: self.sessions.clone(),
        };
        tokio::spawn(async move {
            if let Err(e) = invocation.execute(&tx).await {
                warn!(error = %e, "agent run failed");
                let _ = tx.send(RunnerEvent::Error(format!("{e:#}"))).await;
            }
        });
        ReceiverStream::new(rx)
    }
}

struct Invocation {
    app_name: String,
    user_id: String,
    session_id: String,
    new_message: String,
    agent: Arc<LlmAgent>,
    model: Arc<dyn ModelProvider>,
    sessions: Arc<InMemorySessionService>,
}

impl Invocation {
    /// The main loop: model call → optional tool calls → repeat.
    async fn execute(self, tx: &mpsc::Sender<RunnerEvent>) -> anyhow::Result<()> {
        let handle = self
            .sessions
            .get_session(&self.app_name, &self.user_id, &self.session_id)
            .with_context(|| format!("session not found: {}", self.session_id))?;
        let mut session = handle.lock().await;
        session.push(Message::user(&self.new_message));

        let mut rounds = 0u32;
        loop {
            if tx.is_closed() {
                debug!("event receiver dropped; abandoning run");
                return Ok(());
            }
            rounds += 1;
            let with_tools = rounds <= self.agent.max_tool_rounds;

            let (text, tool_calls) = self.stream_one_turn(&session, with_tools).await?;
            if !text.is_empty() {
                session.push(Message::assistant(&text));
            }

            if tool_calls.is_empty() || !with_tools {
                if !tool_calls.is_empty() {
                    warn!(count = tool_calls.len(), "ignoring tool calls on the tool-free turn");
                }
                let _ = tx.send(RunnerEvent::Final(FinalContent::Text(text))).await;
                return Ok(());
            }

            // All call messages go in before any result message.
            for tc in &tool_calls {
                let _ = tx.send(RunnerEvent::ToolCallRequested(tc.clone())).await;
                session.push(Message::tool_call(&tc.id, &tc.name, tc.args.to_string()));
            }

            let outputs = self.execute_tools(&tool_calls).await;

            if self.agent.skip_summarization {
                for (tc, output) in tool_calls.iter().zip(outputs.iter()) {
                    session.push(Message::tool_result(&tc.id, &tc.name, output.response.clone()));
                }
                let (tc, output) = (&tool_calls[0], &outputs[0]);
                let _ = tx
                    .send(RunnerEvent::Final(FinalContent::FunctionResponse {
                        name: tc.name.clone(),
                        response: output.response.clone(),
                    }))
                    .await;
                return Ok(());
            }

            for (tc, output) in tool_calls.iter().zip(outputs.into_iter()) {
                let _ = tx
                    .send(RunnerEvent::ToolResponse {
                        call_id: tc.id.clone(),
                        tool_name: tc.name.clone(),
                        response: output.response.clone(),
                        is_error: output.is_error,
                    })
                    .await;
                session.push(Message::tool_result(&tc.id, &tc.name, output.response));
            }
        }
    }

    /// Execute all calls in parallel; results keep the order of `calls`.
    async fn execute_tools(&self, calls: &[ToolCall]) -> Vec<ToolOutput> {
        let tasks: Vec<_> = calls
            .iter()
            .cloned()
            .map(|tc| {
                let registry = Arc::clone(&self.agent.tools);
                tokio::spawn(async move { registry.execute(&tc).await })
            })
            .collect();

        let mut outputs = Vec::with_capacity(calls.len());
        for (tc, task) in calls.iter().zip(tasks) {
            let output = match task.await {
                Ok(output) => output,
                Err(e) => ToolOutput::err(&tc.id, format!("tool execution panicked: {e}")),
            };
            outputs.push(output);
        }
        outputs
    }

    /// Call the model once and collect its text and tool calls.
    async fn stream_one_turn(
        &self,
        session: &Session,
        with_tools: bool,
    ) -> anyhow::Result<(String, Vec<ToolCall>)> {
        let mut messages = Vec::with_capacity(session.messages.len() + 2);
        messages.push(self.agent.system_message());
        messages.extend(session.messages.iter().cloned());
        // Request-only; the wrap-up prompt never enters the session history.
        if !with_tools {
            messages.push(Message::user(wrap_up_prompt(self.agent.max_tool_rounds)));
        }

        let req = CompletionRequest {
            messages,
            tools: if with_tools { self.agent.tool_schemas() } else { Vec::new() },
            stream: true,
        };

        let mut stream = self.model.complete(req).await.context("model completion failed")?;

        let mut full_text = String::new();
        // Keyed by the provider's per-turn tool-call index.
        let mut pending: HashMap<u32, PendingToolCall> = HashMap::new();

        while let Some(event) = stream.next().await {
            match event.context("model stream failed")? {
                ResponseEvent::TextDelta(delta) => full_text.push_str(&delta),
                ResponseEvent::ToolCall { index, id, name, arguments } => {
                    let ptc = pending.entry(index).or_default();
                    if !id.is_empty() {
                        ptc.id = id;
                    }
                    if !name.is_empty() {
                        ptc.name = name;
                    }
                    ptc.args_buf.push_str(&arguments);
                }
                ResponseEvent::Usage { input_tokens, output_tokens } => {
                    debug!(input_tokens, output_tokens, agent = %self.agent.name, "token usage");
                }
                ResponseEvent::Done => break,
                ResponseEvent::Error(e) => bail!("model stream error: {e}"),
            }
        }

        let mut sorted: Vec<(u32, PendingToolCall)> = pending.into_iter().collect();
        sorted.sort_by_key(|(idx, _)| *idx);
        let tool_calls = sorted
            .into_iter()
            .filter_map(|(_, ptc)| {
                if ptc.name.is_empty() {
                    warn!(tool_call_id = %ptc.id, "dropping tool call with empty name");
                    return None;
                }
                Some(ptc.finish())
            })
            .collect();

        Ok((full_text, tool_calls))
    }
}

fn wrap_up_prompt(max_tool_rounds: u32) -> String {
    format!(
        "You have reached the maximum number of tool calls ({max_tool_rounds}). \
         Do not call any more tools; answer with the information you already have."
    )
}

#[derive(Default)]
struct PendingToolCall {
    id: String,
    name: String,
    args_buf: String,
}

impl PendingToolCall {
    fn finish(self) -> ToolCall {
        // Arguments always resolve to a JSON object.
        let args = if self.args_buf.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            match serde_json::from_str::<serde_json::Value>(&self.args_buf) {
                Ok(v) if v.is_object() => v,
                Ok(_) | Err(_) => {
                    warn!(
                        tool_name = %self.name,
                        args_buf = %self.args_buf,
                        "model sent tool call with invalid arguments; substituting {{}}"
                    );
                    serde_json::Value::Object(Default::default())
                }
            }
        };
        let id = if self.id.is_empty() {
            format!("adk-{}", Uuid::new_v4())
        } else {
            self.id
        };
        ToolCall { id, name: self.name, args }
    }
}
