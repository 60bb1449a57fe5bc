// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! In-process task-protocol seams: the task data model, the event queue an
//! executor publishes to, and the [`AgentExecutor`] trait servers call.

mod card;
mod context;
mod error;
mod executor;
mod queue;
mod types;
mod updater;
mod utils;

pub use card::{AgentCapabilities, AgentCard, AgentSkill};
pub use context::RequestContext;
pub use error::A2aError;
pub use executor::{fold_task, spawn_execution, AgentExecutor, Execution};
pub use queue::EventQueue;
pub use types::*;
pub use updater::TaskUpdater;
pub use utils::{new_agent_parts_message, new_agent_text_message, new_task};
