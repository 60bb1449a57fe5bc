// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider identifier: "google" or "mock"
    pub provider: String,
    /// Model name forwarded to the provider API
    pub name: String,
    /// Environment variable that holds the API key (read at runtime)
    pub api_key_env: Option<String>,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    /// Base URL override for proxies or a local emulator.
    pub base_url: Option<String>,
    /// Maximum tokens to request in a single completion
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0–2.0)
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "google".into(),
            name: "gemini-2.0-flash-001".into(),
            api_key_env: None,
            api_key: None,
            base_url: None,
            max_tokens: Some(2048),
            temperature: Some(0.2),
        }
    }
}

fn default_max_tool_rounds() -> u32 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model ↔ tool rounds before the runner forces a
    /// final tool-free turn.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,
    /// Return the first tool response as the final answer instead of
    /// handing it back to the model for a written reply.
    #[serde(default)]
    pub skip_summarization: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            skip_summarization: false,
        }
    }
}

/// Locations of the static lookup tables.
///
/// Relative paths are resolved against the process working directory; a
/// leading `~` is expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub faqs: PathBuf,
    pub orders: PathBuf,
    pub products: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            faqs: PathBuf::from("data/faqs.txt"),
            orders: PathBuf::from("data/orders.csv"),
            products: PathBuf::from("data/products.csv"),
        }
    }
}

impl DataConfig {
    pub fn faqs_path(&self) -> PathBuf {
        expand(&self.faqs)
    }

    pub fn orders_path(&self) -> PathBuf {
        expand(&self.orders)
    }

    pub fn products_path(&self) -> PathBuf {
        expand(&self.products)
    }
}

fn expand(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}
