// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::profile::{AgentProfile, CompletionDispatch, SkillSpec};

pub(crate) const PROFILE: AgentProfile = AgentProfile {
    name: "order_management_agent",
    description: "This agent handles the order management process for the customer \
                  given the order id.",
    instruction: r#"
You are an agent who handles the order management process for customers.

When asked about an order:
1. Use the search_orders tool to search for orders in our catalog
2. Return the exact message provided in the 'message' field of the tool's response
3. If orders are found, you can provide additional details about them if requested
4. Be polite and professional in your interactions

The search_orders tool searches in our order catalog database and returns matching orders based on the description.
"#,
    processing_message: "Processing the order management request...",
    completion: CompletionDispatch::MessageOnly,
    skill: SkillSpec {
        id: "search_orders",
        name: "Gestión de pedidos",
        description: "Consulta el estado y los detalles de un pedido a partir de su ID.",
        tags: &["pedidos", "órdenes", "seguimiento"],
        examples: &["¿Cuál es el estado de mi pedido 1001?", "Muéstrame todos los pedidos"],
    },
    default_port: 10002,
};
