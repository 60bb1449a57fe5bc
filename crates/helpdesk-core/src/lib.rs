// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod agent;
mod events;
mod runner;
mod session;

pub use agent::{LlmAgent, DEFAULT_MAX_TOOL_ROUNDS};
pub use events::{FinalContent, RunnerEvent};
pub use runner::{Runner, RunnerStream};
pub use session::{InMemorySessionService, Session, SessionHandle};
