// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod google;
mod mock;
mod provider;
mod types;

pub use google::GoogleProvider;
pub use mock::{MockProvider, ScriptedMockProvider};
pub use provider::{ModelProvider, ResponseStream};
pub use types::*;

use anyhow::bail;
use helpdesk_config::ModelConfig;

/// Environment variables consulted for a Gemini key when the config names none.
const FALLBACK_KEY_ENVS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Construct a boxed [`ModelProvider`] from configuration.
///
/// Provider selection:
/// - `"google"` / `"gemini"` → [`GoogleProvider`]
/// - `"mock"` → [`MockProvider`] (echo-back)
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    match cfg.provider.as_str() {
        "google" | "gemini" => Ok(Box::new(GoogleProvider::new(
            cfg.name.clone(),
            resolve_api_key(cfg),
            cfg.base_url.clone(),
            cfg.max_tokens,
            cfg.temperature,
        ))),
        "mock" => Ok(Box::new(MockProvider)),
        other => bail!("unknown model provider: {other}"),
    }
}

fn resolve_api_key(cfg: &ModelConfig) -> Option<String> {
    if let Some(k) = &cfg.api_key {
        return Some(k.clone());
    }
    if let Some(env) = &cfg.api_key_env {
        if let Ok(v) = std::env::var(env) {
            return Some(v);
        }
    }
    FALLBACK_KEY_ENVS
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_provider_from_config() {
        let cfg = ModelConfig { provider: "mock".into(), ..ModelConfig::default() };
        let p = from_config(&cfg).unwrap();
        assert_eq!(p.name(), "mock");
    }

    #[test]
    fn google_provider_keeps_model_name() {
        let cfg = ModelConfig { api_key: Some("k".into()), ..ModelConfig::default() };
        let p = from_config(&cfg).unwrap();
        assert_eq!(p.name(), "google");
        assert_eq!(p.model_name(), "gemini-2.0-flash-001");
    }

    #[test]
    fn unknown_provider_is_error() {
        let cfg = ModelConfig { provider: "nope".into(), ..ModelConfig::default() };
        assert!(from_config(&cfg).is_err());
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let cfg = ModelConfig {
            api_key: Some("explicit".into()),
            api_key_env: Some("HELPDESK_TEST_UNUSED_KEY".into()),
            ..ModelConfig::default()
        };
        assert_eq!(resolve_api_key(&cfg).as_deref(), Some("explicit"));
    }
}
