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
use crate::table::{Table, TableError};
use crate::tool::{optional_str_arg, Tool, ToolCall, ToolOutput};

#[derive(Debug, Clone, Serialize)]
pub struct OrderSearch {
    pub request_id: String,
    pub orders_list: Vec<Value>,
    pub message: String,
}

/// Look up orders by exact id, or list every order when `order_id` is absent.
pub fn search_orders(path: &Path, order_id: Option<&str>, log: &RequestIdLog) -> OrderSearch {
    let request_id = log.issue();
    let order_id = order_id.filter(|s| !s.is_empty());
    match lookup(path, order_id) {
        Ok((orders_list, message)) => OrderSearch { request_id, orders_list, message },
        Err(e) => OrderSearch {
            request_id,
            orders_list: Vec::new(),
            message: format!("Error al buscar órdenes: {e}"),
        },
    }
}

fn lookup(path: &Path, order_id: Option<&str>) -> Result<(Vec<Value>, String), TableError> {
    let table = Table::load(path)?;
    let id_col = table.column("id")?;

    let Some(wanted) = order_id else {
        let ids: Vec<&str> = table.rows().map(|r| r.get(id_col)).collect();
        let orders = table.rows().map(|r| r.to_json()).collect::<Vec<_>>();
        let message = format!(
            "Encontramos {} órdenes en nuestro sistema: {}",
            orders.len(),
            ids.join(", ")
        );
        return Ok((orders, message));
    };

    let orders: Vec<Value> = table
        .rows()
        .filter(|r| r.get(id_col) == wanted)
        .map(|r| r.to_json())
        .collect();
    let message = if orders.is_empty() {
        format!("No encontramos ninguna orden con ID '{wanted}' en nuestro sistema.")
    } else {
        format!("Encontramos la orden con ID '{wanted}' en nuestro sistema.")
    };
    Ok((orders, message))
}

pub struct SearchOrdersTool {
    path: PathBuf,
    log: Arc<RequestIdLog>,
}

impl SearchOrdersTool {
    pub fn new(path: impl Into<PathBuf>, log: Arc<RequestIdLog>) -> Self {
        Self { path: path.into(), log }
    }
}

#[async_trait]
impl Tool for SearchOrdersTool {
    fn name(&self) -> &str {
        "search_orders"
    }

    fn description(&self) -> &str {
        "Search for orders in the system. Without an order_id every order is returned.\n\
         Returns the request_id, the list of found orders and a message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {
                    "type": "string",
                    "description": "The ID of the order to search for"
                }
            }
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let order_id = optional_str_arg(&call.args, "order_id");
        debug!(order_id = ?order_id, "search_orders tool");

        let path = self.path.clone();
        let log = self.log.clone();
        let result = tokio::task::spawn_blocking(move || {
            search_orders(&path, order_id.as_deref(), &log)
        })
        .await;

        match result.map(serde_json::to_value) {
            Ok(Ok(v)) => ToolOutput::ok(&call.id, v),
            Ok(Err(e)) => ToolOutput::err(&call.id, format!("serialising result: {e}")),
            Err(e) => ToolOutput::err(&call.id, format!("search_orders task failed: {e}")),
        }
    }
}
