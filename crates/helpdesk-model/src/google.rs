// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Google Gemini driver for the native Generative Language API.
//!
//! Streams `streamGenerateContent?alt=sse`, translating each SSE `data:`
//! payload into [`ResponseEvent`]s.  Gemini delivers function calls whole
//! rather than as argument deltas, so every call gets its own index.
//!
//! # Auth
//! API key via the `?key=...` query parameter.

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use tracing::debug;

use crate::{provider::ResponseStream, CompletionRequest, Message, MessageContent, ResponseEvent, Role};

pub struct GoogleProvider {
    model: String,
    api_key: Option<String>,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(
        model: String,
        api_key: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://generativelanguage.googleapis.com".into()),
            max_tokens: max_tokens.unwrap_or(2048),
            temperature: temperature.unwrap_or(0.2),
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, req: &CompletionRequest) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for m in &req.messages {
            let role = match m.role {
                Role::System => {
                    if let Some(t) = m.as_text() {
                        system_parts.push(json!({ "text": t }));
                    }
                    continue;
                }
                Role::User | Role::Tool => "user",
                Role::Assistant => "model",
            };
            let parts = message_to_gemini_parts(m);
            // Parallel calls and their responses must share one content entry.
            match contents.last_mut() {
                Some(last) if last["role"] == role => {
                    if let Some(existing) = last["parts"].as_array_mut() {
                        existing.extend(parts);
                    }
                }
                _ => contents.push(json!({ "role": role, "parts": parts })),
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature": self.temperature,
            }
        });
        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }
        if !req.tools.is_empty() {
            let declarations: Vec<Value> = req
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }
        body
    }
}

#[async_trait]
impl crate::ModelProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<ResponseStream> {
        let key = self
            .api_key
            .as_deref()
            .context("no Gemini API key: set GOOGLE_API_KEY or model.api_key_env")?;

        let body = self.request_body(&req);
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            key
        );

        debug!(model = %self.model, tools = req.tools.len(), "sending Google Gemini request");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Google Gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Google Gemini error {status}: {text}");
        }

        // SSE lines may be split across network chunks; buffer raw bytes so
        // multi-byte characters are never cut in half.
        let mut buffer: Vec<u8> = Vec::new();
        let mut next_index: u32 = 0;
        let event_stream = resp
            .bytes_stream()
            .map(move |chunk| {
                let bytes = match chunk {
                    Ok(b) => b,
                    Err(e) => return vec![Err(anyhow!(e))],
                };
                buffer.extend_from_slice(&bytes);
                let mut out = Vec::new();
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let raw: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&raw);
                    let Some(data) = line.trim_end().strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        out.push(Ok(ResponseEvent::Done));
                        continue;
                    }
                    match serde_json::from_str::<Value>(data) {
                        Ok(v) => out.extend(parse_gemini_chunk(&v, &mut next_index).into_iter().map(Ok)),
                        Err(e) => debug!(error = %e, "skipping malformed SSE payload"),
                    }
                }
                out
            })
            .flat_map(futures::stream::iter);

        Ok(Box::pin(event_stream))
    }
}

/// Convert a message into a Gemini `parts` array.
fn message_to_gemini_parts(m: &Message) -> Vec<Value> {
    match &m.content {
        MessageContent::Text(t) => vec![json!({ "text": t })],
        MessageContent::ToolCall { function, .. } => {
            let args: Value = serde_json::from_str(&function.arguments).unwrap_or(json!({}));
            vec![json!({
                "functionCall": {
                    "name": function.name,
                    "args": args,
                }
            })]
        }
        MessageContent::ToolResult { name, response, .. } => {
            // Gemini requires the response to be a JSON object.
            let response = if response.is_object() {
                response.clone()
            } else {
                json!({ "output": response })
            };
            vec![json!({
                "functionResponse": {
                    "name": name,
                    "response": response,
                }
            })]
        }
    }
}

fn parse_gemini_chunk(v: &Value, next_index: &mut u32) -> Vec<ResponseEvent> {
    let mut events = Vec::new();

    if let Some(err) = v.get("error") {
        let msg = err["message"].as_str().unwrap_or("unknown Gemini error");
        events.push(ResponseEvent::Error(msg.to_string()));
        return events;
    }

    let candidate = &v["candidates"][0];
    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            if let Some(fc) = part.get("functionCall") {
                let name = fc["name"].as_str().unwrap_or_default().to_string();
                let args = serde_json::to_string(&fc["args"]).unwrap_or_else(|_| "{}".into());
                events.push(ResponseEvent::ToolCall {
                    index: *next_index,
                    id: fc["id"].as_str().unwrap_or_default().to_string(),
                    name,
                    arguments: args,
                });
                *next_index += 1;
            } else if let Some(text) = part["text"].as_str() {
                if !text.is_empty() {
                    events.push(ResponseEvent::TextDelta(text.to_string()));
                }
            }
        }
    }

    if let Some(meta) = v.get("usageMetadata") {
        events.push(ResponseEvent::Usage {
            input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        });
    }

    if candidate["finishReason"].as_str().is_some() {
        events.push(ResponseEvent::Done);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelProvider, ToolSchema};

    fn provider() -> GoogleProvider {
        GoogleProvider::new("gemini-2.0-flash-001".into(), None, None, None, None)
    }

    #[test]
    fn provider_name() {
        let p = provider();
        assert_eq!(p.name(), "google");
        assert_eq!(p.model_name(), "gemini-2.0-flash-001");
    }

    #[tokio::test]
    async fn missing_key_is_error() {
        let err = provider()
            .complete(CompletionRequest::default())
            .await
            .err()
            .expect("request without key must fail");
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn usage_and_finish_reason_parsed() {
        let v = json!({
            "candidates": [{ "content": { "parts": [{ "text": "fin" }] }, "finishReason": "STOP" }],
            "usageMetadata": { "promptTokenCount": 100, "candidatesTokenCount": 50 }
        });
        let mut idx = 0;
        let evs = parse_gemini_chunk(&v, &mut idx);
        assert!(matches!(&evs[0], ResponseEvent::TextDelta(t) if t == "fin"));
        assert!(matches!(evs[1], ResponseEvent::Usage { input_tokens: 100, output_tokens: 50 }));
        assert!(matches!(evs[2], ResponseEvent::Done));
    }

    #[test]
    fn parallel_function_calls_get_distinct_indices() {
        let v = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "functionCall": { "name": "search_orders", "args": { "order_id": "1" } } },
                        { "functionCall": { "name": "search_orders", "args": { "order_id": "2" } } }
                    ]
                }
            }]
        });
        let mut idx = 0;
        let evs = parse_gemini_chunk(&v, &mut idx);
        assert_eq!(evs.len(), 2);
        assert!(matches!(&evs[0], ResponseEvent::ToolCall { index: 0, name, .. } if name == "search_orders"));
        assert!(matches!(&evs[1], ResponseEvent::ToolCall { index: 1, arguments, .. } if arguments.contains("\"2\"")));
        assert_eq!(idx, 2);
    }

    #[test]
    fn error_payload_becomes_error_event() {
        let v = json!({ "error": { "code": 429, "message": "quota exceeded" } });
        let mut idx = 0;
        let evs = parse_gemini_chunk(&v, &mut idx);
        assert!(matches!(&evs[0], ResponseEvent::Error(m) if m == "quota exceeded"));
    }

    #[test]
    fn request_body_groups_tool_traffic_and_system_instruction() {
        let req = CompletionRequest {
            messages: vec![
                Message::system("Eres un asistente."),
                Message::user("¿Dónde está mi pedido 7?"),
                Message::tool_call("c1", "search_orders", r#"{"order_id":"7"}"#),
                Message::tool_result("c1", "search_orders", json!({"message": "ok"})),
                Message::tool_result("c2", "search_orders", json!("plain")),
            ],
            tools: vec![ToolSchema {
                name: "search_orders".into(),
                description: "Busca pedidos".into(),
                parameters: json!({ "type": "object" }),
            }],
            stream: true,
        };
        let body = provider().request_body(&req);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Eres un asistente.");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["args"]["order_id"], "7");
        let responses = contents[2]["parts"].as_array().unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["functionResponse"]["response"]["message"], "ok");
        assert_eq!(responses[1]["functionResponse"]["response"]["output"], "plain");
        assert_eq!(body["tools"][0]["functionDeclarations"][0]["name"], "search_orders");
    }
}
