// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod builtin;
mod registry;
mod request_id;
mod table;
mod tool;

pub use builtin::search_faqs::{search_faqs, FaqSearch, SearchFaqsTool};
pub use builtin::search_orders::{search_orders, OrderSearch, SearchOrdersTool};
pub use builtin::search_products::{search_products, ProductSearch, SearchProductsTool};
pub use registry::{ToolRegistry, ToolSchema};
pub use request_id::RequestIdLog;
pub use table::{Row, Table, TableError};
pub use tool::{Tool, ToolCall, ToolOutput};
