// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
pub mod search_faqs;
pub mod search_orders;
pub mod search_products;
