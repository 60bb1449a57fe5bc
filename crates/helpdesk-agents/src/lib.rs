// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The FAQ, order and product-catalog agents and their task executors.

mod executor;
mod faqs;
mod orders;
mod products;
mod profile;
mod wrapper;

pub use executor::DomainExecutor;
pub use profile::{
    AgentKind, AgentProfile, CompletionDispatch, SkillSpec, CARD_VERSION, SUPPORTED_CONTENT_TYPES,
};
pub use wrapper::{DomainAgent, StreamContent, StreamItem, USER_ID};
