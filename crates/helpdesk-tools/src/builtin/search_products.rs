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
pub struct ProductSearch {
    pub request_id: String,
    pub products_list: Vec<Value>,
    pub message: String,
}

/// Find catalog products whose description contains `product_name`
/// (case-insensitive, plain substring).  Without a key the whole catalog is
/// returned.
pub fn search_products(
    path: &Path,
    product_name: Option<&str>,
    log: &RequestIdLog,
) -> ProductSearch {
    let request_id = log.issue();
    let product_name = product_name.filter(|s| !s.is_empty());
    match lookup(path, product_name) {
        Ok((products_list, message)) => ProductSearch { request_id, products_list, message },
        Err(e) => ProductSearch {
            request_id,
            products_list: Vec::new(),
            message: format!("Error al buscar productos: {e}"),
        },
    }
}

fn lookup(path: &Path, product_name: Option<&str>) -> Result<(Vec<Value>, String), TableError> {
    let table = Table::load(path)?;

    let Some(key) = product_name else {
        let name_col = table.column("name")?;
        let names: Vec<&str> = table.rows().map(|r| r.get(name_col)).collect();
        let products: Vec<Value> = table.rows().map(|r| r.to_json()).collect();
        let message = format!(
            "Encontramos {} productos en nuestro catálogo: {}",
            products.len(),
            names.join(", ")
        );
        return Ok((products, message));
    };

    let desc_col = table.column("description")?;
    let needle = key.to_lowercase();
    let matches: Vec<_> = table
        .rows()
        .filter(|r| r.get(desc_col).to_lowercase().contains(&needle))
        .collect();

    if matches.is_empty() {
        let message =
            format!("No encontramos ningún producto que coincida con '{key}' en nuestro catálogo.");
        return Ok((Vec::new(), message));
    }

    let name_col = table.column("name")?;
    let names: Vec<&str> = matches.iter().map(|r| r.get(name_col)).collect();
    let message = format!(
        "Encontramos {} productos que coinciden con '{key}': {}",
        matches.len(),
        names.join(", ")
    );
    Ok((matches.iter().map(|r| r.to_json()).collect(), message))
}

pub struct SearchProductsTool {
    path: PathBuf,
    log: Arc<RequestIdLog>,
}

impl SearchProductsTool {
    pub fn new(path: impl Into<PathBuf>, log: Arc<RequestIdLog>) -> Self {
        Self { path: path.into(), log }
    }
}

#[async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> &str {
        "search_products"
    }

    fn description(&self) -> &str {
        "Search for products in the catalog by matching product_name in descriptions.\n\
         Without a product_name the full catalog is returned.\n\
         Returns the request_id, the list of found products and a message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "product_name": {
                    "type": "string",
                    "description": "The name of the product to search for"
                }
            }
        })
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let product_name = optional_str_arg(&call.args, "product_name");
        debug!(product_name = ?product_name, "search_products tool");

        let path = self.path.clone();
        let log = self.log.clone();
        let result = tokio::task::spawn_blocking(move || {
            search_products(&path, product_name.as_deref(), &log)
        })
        .await;

        match result.map(serde_json::to_value) {
            Ok(Ok(v)) => ToolOutput::ok(&call.id, v),
            Ok(Err(e)) => ToolOutput::err(&call.id, format!("serialising result: {e}")),
            Err(e) => ToolOutput::err(&call.id, format!("search_products task failed: {e}")),
        }
    }
}
