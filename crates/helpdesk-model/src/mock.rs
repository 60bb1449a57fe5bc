// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use crate::{provider::ResponseStream, CompletionRequest, ResponseEvent};

/// Deterministic mock provider.  Echoes the last user message back as the
/// assistant response and never calls tools.
#[derive(Default)]
pub struct MockProvider;

#[async_trait]
impl crate::ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let reply = req
            .messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, crate::Role::User))
            .and_then(|m| m.as_text())
            .unwrap_or("[no input]")
            .to_string();

        let events: Vec<anyhow::Result<ResponseEvent>> = vec![
            Ok(ResponseEvent::TextDelta(format!("MOCK: {reply}"))),
            Ok(ResponseEvent::Usage { input_tokens: 10, output_tokens: 10 }),
            Ok(ResponseEvent::Done),
        ];
        Ok(Box::pin(stream::iter(events)))
    }
}

/// A pre-scripted mock provider.  Each call to `complete` pops the next
/// response script from the front of the queue, so tests can specify exact
/// event sequences (tool calls included) without network access.
pub struct ScriptedMockProvider {
    scripts: Arc<Mutex<Vec<Vec<ResponseEvent>>>>,
    /// Every `CompletionRequest` seen by this provider, oldest first.
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedMockProvider {
    /// The outer `Vec` is the ordered list of calls; the inner `Vec` is the
    /// sequence of [`ResponseEvent`]s emitted for that call.
    pub fn new(scripts: Vec<Vec<ResponseEvent>>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that always returns a single text reply.
    pub fn always_text(reply: impl Into<String>) -> Self {
        Self::new(vec![vec![
            ResponseEvent::TextDelta(reply.into()),
            ResponseEvent::Usage { input_tokens: 5, output_tokens: 5 },
            ResponseEvent::Done,
        ]])
    }

    /// Provider that returns a tool call followed by a text reply.
    pub fn tool_then_text(
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        args_json: impl Into<String>,
        final_text: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            vec![
                ResponseEvent::ToolCall {
                    index: 0,
                    id: tool_id.into(),
                    name: tool_name.into(),
                    arguments: args_json.into(),
                },
                ResponseEvent::Done,
            ],
            vec![ResponseEvent::TextDelta(final_text.into()), ResponseEvent::Done],
        ])
    }

    /// Provider that only ever emits a single tool call.
    pub fn tool_only(
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        args_json: impl Into<String>,
    ) -> Self {
        Self::new(vec![vec![
            ResponseEvent::ToolCall {
                index: 0,
                id: tool_id.into(),
                name: tool_name.into(),
                arguments: args_json.into(),
            },
            ResponseEvent::Done,
        ]])
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl crate::ModelProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }
    fn model_name(&self) -> &str {
        "scripted-mock-model"
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(req);
        }
        let events = match self.scripts.lock() {
            Ok(mut scripts) if !scripts.is_empty() => scripts.remove(0),
            // Fallback when all scripts are consumed
            _ => vec![ResponseEvent::TextDelta("[no more scripts]".into()), ResponseEvent::Done],
        };
        let wrapped: Vec<anyhow::Result<ResponseEvent>> = events.into_iter().map(Ok).collect();
        Ok(Box::pin(stream::iter(wrapped)))
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::{Message, ModelProvider};

    fn req() -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::user("hola")],
            stream: true,
            ..Default::default()
        }
    }

    async fn collect(p: &dyn ModelProvider) -> Vec<ResponseEvent> {
        let mut stream = p.complete(req()).await.unwrap();
        let mut out = Vec::new();
        while let Some(ev) = stream.next().await {
            out.push(ev.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn mock_echoes_last_user_message() {
        let evs = collect(&MockProvider).await;
        assert!(matches!(&evs[0], ResponseEvent::TextDelta(t) if t == "MOCK: hola"));
        assert!(matches!(evs.last(), Some(ResponseEvent::Done)));
    }

    #[tokio::test]
    async fn scripted_pops_scripts_in_order() {
        let p = ScriptedMockProvider::tool_then_text("c1", "search_faqs", r#"{"query":"envío"}"#, "listo");
        let first = collect(&p).await;
        assert!(matches!(&first[0], ResponseEvent::ToolCall { name, .. } if name == "search_faqs"));
        let second = collect(&p).await;
        assert!(matches!(&second[0], ResponseEvent::TextDelta(t) if t == "listo"));
        assert_eq!(p.call_count(), 2);
    }

    #[tokio::test]
    async fn scripted_falls_back_when_exhausted() {
        let p = ScriptedMockProvider::always_text("una vez");
        let _ = collect(&p).await;
        let evs = collect(&p).await;
        assert!(matches!(&evs[0], ResponseEvent::TextDelta(t) if t == "[no more scripts]"));
    }
}
