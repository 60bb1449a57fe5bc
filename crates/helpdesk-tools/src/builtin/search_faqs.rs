// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::request_id::RequestIdLog;
use crate::tool::{Tool, ToolCall, ToolOutput};

#[derive(Debug, Clone, Serialize)]
pub struct FaqSearch {
    pub request_id: String,
    pub faqs_content: String,
    pub query: String,
    pub message: String,
}

/// Return the whole FAQ document; the model picks the relevant answer.
pub fn search_faqs(path: &Path, query: &str, log: &RequestIdLog) -> FaqSearch {
    let request_id = log.issue();
    match std::fs::read_to_string(path) {
        Ok(faqs_content) => FaqSearch {
            request_id,
            faqs_content,
            query: query.to_string(),
            message: "He encontrado información relevante para tu pregunta.".into(),
        },
        Err(e) => FaqSearch {
            request_id,
            faqs_content: String::new(),
            query: query.to_string(),
            message: format!("Error al buscar información: {}: {e}", path.display()),
        },
    }
}

pub struct SearchFaqsTool {
    path: PathBuf,
    log: Arc<RequestIdLog>,
}

impl SearchFaqsTool {
    pub fn new(path: impl Into<PathBuf>, log: Arc<RequestIdLog>) -> Self {
        Self { path: path.into(), log }
    }
}

#[async_trait]
impl Tool for SearchFaqsTool {
    fn name(&self) -> &str {
        "search_faqs"
    }

    fn description(&self) -> &str {
        "Search for answers to FAQs based on the query.\n\
         Returns the request_id, the complete FAQs content, the query and a message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question from the user"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let Some(query) = call.args.get("query").and_then(|v| v.as_str()) else {
            let args_preview =
                serde_json::to_string(&call.args).unwrap_or_else(|_| "null".to_string());
            return ToolOutput::err(
                &call.id,
                format!("missing required parameter 'query'. Received: {args_preview}"),
            );
        };
        debug!(query = %query, "search_faqs tool");

        let path = self.path.clone();
        let log = self.log.clone();
        let query = query.to_string();
        let result = tokio::task::spawn_blocking(move || search_faqs(&path, &query, &log)).await;

        match result.map(serde_json::to_value) {
            Ok(Ok(v)) => ToolOutput::ok(&call.id, v),
            Ok(Err(e)) => ToolOutput::err(&call.id, format!("serialising result: {e}")),
            Err(e) => ToolOutput::err(&call.id, format!("search_faqs task failed: {e}")),
        }
    }
}
