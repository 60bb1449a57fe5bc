// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::{Tool, ToolCall, ToolOutput};

/// Function declaration advertised to the model.  Kept separate from the
/// model crate's type so lookup tools do not depend on any provider.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// The tools one agent exposes, keyed and ordered by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tool`, replacing any tool registered under the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            warn!(tool = %name, "tool registered twice; keeping the later one");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(Arc::clone)
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Dispatch `call` by name.  A name the model made up yields an error
    /// output rather than a panic or an `Err`.
    pub async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!(tool = %call.name, "model called an unregistered tool");
            return ToolOutput::err(&call.id, format!("unknown tool: {}", call.name));
        };
        tool.execute(call).await
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    struct EchoTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "echoes its input"
        }
        fn parameters_schema(&self) -> Value {
            json!({ "type": "object" })
        }
        async fn execute(&self, call: &ToolCall) -> ToolOutput {
            ToolOutput::ok(&call.id, json!({ "echo": call.args }))
        }
    }

    #[test]
    fn reregistering_replaces_the_tool() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool { name: "echo" });
        reg.register(EchoTool { name: "echo" });
        assert_eq!(reg.len(), 1);
        assert!(reg.get("echo").is_some());
        assert!(reg.get("search_orders").is_none());
    }

    #[test]
    fn names_and_schemas_are_sorted() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool { name: "b" });
        reg.register(EchoTool { name: "a" });
        assert_eq!(reg.names(), vec!["a", "b"]);
        let schemas = reg.schemas();
        assert_eq!(schemas[0].name, "a");
        assert_eq!(schemas[1].description, "echoes its input");
    }

    #[tokio::test]
    async fn execute_dispatches_by_name() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool { name: "echo" });
        let call = ToolCall { id: "1".into(), name: "echo".into(), args: json!({ "x": 1 }) };
        let out = reg.execute(&call).await;
        assert!(!out.is_error);
        assert_eq!(out.call_id, "1");
        assert_eq!(out.response["echo"]["x"], 1);
    }

    #[tokio::test]
    async fn unregistered_tool_yields_error_output() {
        let reg = ToolRegistry::new();
        let call = ToolCall { id: "1".into(), name: "missing".into(), args: json!({}) };
        let out = reg.execute(&call).await;
        assert!(out.is_error);
        assert!(out.response["error"].as_str().unwrap().contains("unknown tool"));
    }
}
