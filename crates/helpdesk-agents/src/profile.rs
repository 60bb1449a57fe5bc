// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use helpdesk_a2a::{AgentCapabilities, AgentCard, AgentSkill};
use helpdesk_config::DataConfig;
use helpdesk_tools::{RequestIdLog, SearchFaqsTool, SearchOrdersTool, SearchProductsTool, ToolRegistry};

use crate::{faqs, orders, products};

/// Content types every agent accepts and produces.
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &["text", "text/plain"];

/// Version advertised on agent cards.
pub const CARD_VERSION: &str = "1.0.0";

/// The three help-desk agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Faqs,
    Orders,
    Products,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Faqs, AgentKind::Orders, AgentKind::Products];

    pub fn profile(self) -> &'static AgentProfile {
        match self {
            AgentKind::Faqs => &faqs::PROFILE,
            AgentKind::Orders => &orders::PROFILE,
            AgentKind::Products => &products::PROFILE,
        }
    }

    /// The lookup tool this agent exposes, bound to its data file.
    pub fn tools(self, data: &DataConfig, log: Arc<RequestIdLog>) -> ToolRegistry {
        let mut reg = ToolRegistry::new();
        match self {
            AgentKind::Faqs => reg.register(SearchFaqsTool::new(data.faqs_path(), log)),
            AgentKind::Orders => reg.register(SearchOrdersTool::new(data.orders_path(), log)),
            AgentKind::Products => reg.register(SearchProductsTool::new(data.products_path(), log)),
        }
        reg
    }

    pub fn data_path(self, data: &DataConfig) -> PathBuf {
        match self {
            AgentKind::Faqs => data.faqs_path(),
            AgentKind::Orders => data.orders_path(),
            AgentKind::Products => data.products_path(),
        }
    }

    /// Agent card advertising this agent at `url`, or at its default local
    /// port when no url is given.
    pub fn card(self, url: Option<&str>) -> AgentCard {
        let p = self.profile();
        let url = url
            .map(str::to_string)
            .unwrap_or_else(|| format!("http://localhost:{}/", p.default_port));
        let modes: Vec<String> = SUPPORTED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect();
        AgentCard {
            name: p.name.to_string(),
            description: p.description.to_string(),
            url,
            version: CARD_VERSION.to_string(),
            default_input_modes: modes.clone(),
            default_output_modes: modes,
            capabilities: AgentCapabilities { streaming: true, ..Default::default() },
            skills: vec![AgentSkill {
                id: p.skill.id.to_string(),
                name: p.skill.name.to_string(),
                description: p.skill.description.to_string(),
                tags: p.skill.tags.iter().map(|s| s.to_string()).collect(),
                examples: p.skill.examples.iter().map(|s| s.to_string()).collect(),
            }],
        }
    }
}

impl FromStr for AgentKind {
    type Err = String;

    /// Accepts the short key (`faqs`, `orders`, `products`) or the agent name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        AgentKind::ALL
            .into_iter()
            .find(|k| k.key() == s || k.profile().name == s)
            .ok_or_else(|| format!("unknown agent '{s}' (expected faqs, orders or products)"))
    }
}

impl AgentKind {
    pub fn key(self) -> &'static str {
        match self {
            AgentKind::Faqs => "faqs",
            AgentKind::Orders => "orders",
            AgentKind::Products => "products",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// How a structured final answer is turned into task updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionDispatch {
    /// Complete with the response's `message` text.
    MessageOnly,
    /// As `MessageOnly`, and first publish the non-empty list under
    /// `list_key` as a data artifact `{wrapper_key: [...]}` named `artifact`.
    WithDataArtifact {
        artifact: &'static str,
        list_key: &'static str,
        wrapper_key: &'static str,
    },
}

#[derive(Debug)]
pub struct SkillSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub examples: &'static [&'static str],
}

/// Static description of one agent.
#[derive(Debug)]
pub struct AgentProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    /// Progress text published while the agent works
    pub processing_message: &'static str,
    pub completion: CompletionDispatch,
    pub skill: SkillSpec,
    pub default_port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_keys_and_names() {
        assert_eq!("faqs".parse::<AgentKind>().unwrap(), AgentKind::Faqs);
        assert_eq!("Orders".parse::<AgentKind>().unwrap(), AgentKind::Orders);
        assert_eq!("product_catalog_agent".parse::<AgentKind>().unwrap(), AgentKind::Products);
        assert!("billing".parse::<AgentKind>().is_err());
    }

    #[test]
    fn profiles_have_expected_names_and_messages() {
        let faqs = AgentKind::Faqs.profile();
        assert_eq!(faqs.name, "faqs_management_agent");
        assert_eq!(faqs.processing_message, "Procesando tu consulta general sobre la empresa...");
        let orders = AgentKind::Orders.profile();
        assert_eq!(orders.name, "order_management_agent");
        assert_eq!(orders.processing_message, "Processing the order management request...");
        let products = AgentKind::Products.profile();
        assert_eq!(products.name, "product_catalog_agent");
        assert_eq!(products.processing_message, "Processing the product catalog request...");
    }

    #[test]
    fn only_products_publish_a_data_artifact() {
        assert_eq!(AgentKind::Faqs.profile().completion, CompletionDispatch::MessageOnly);
        assert_eq!(AgentKind::Orders.profile().completion, CompletionDispatch::MessageOnly);
        assert!(matches!(
            AgentKind::Products.profile().completion,
            CompletionDispatch::WithDataArtifact { artifact: "products", .. }
        ));
    }

    #[test]
    fn each_agent_registers_one_tool() {
        let data = DataConfig::default();
        let log = Arc::new(RequestIdLog::new());
        assert_eq!(AgentKind::Faqs.tools(&data, log.clone()).names(), vec!["search_faqs"]);
        assert_eq!(AgentKind::Orders.tools(&data, log.clone()).names(), vec!["search_orders"]);
        assert_eq!(AgentKind::Products.tools(&data, log).names(), vec!["search_products"]);
    }

    #[test]
    fn card_advertises_text_modes() {
        let card = AgentKind::Orders.card(None);
        assert_eq!(card.name, "order_management_agent");
        assert_eq!(card.default_input_modes, vec!["text", "text/plain"]);
        assert_eq!(card.url, "http://localhost:10002/");
        assert!(card.capabilities.streaming);
        let card = AgentKind::Faqs.card(Some("https://help.example.com/faqs"));
        assert_eq!(card.url, "https://help.example.com/faqs");
    }
}
