// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::profile::{AgentProfile, CompletionDispatch, SkillSpec};

pub(crate) const PROFILE: AgentProfile = AgentProfile {
    name: "product_catalog_agent",
    description: "This agent handles the product catalog search process for the customer \
                  given the name of the product.",
    instruction: r#"
You are an agent who handles the product catalog search process for customers.

When asked about a product:
1. Use the search_products tool to search for products in our catalog
2. Return the exact message provided in the 'message' field of the tool's response
3. If products are found, you can provide additional details about them if requested
4. Be polite and professional in your interactions

The search_products tool searches in our product catalog database and returns matching products based on the description.
"#,
    processing_message: "Processing the product catalog request...",
    completion: CompletionDispatch::WithDataArtifact {
        artifact: "products",
        list_key: "products_list",
        wrapper_key: "products",
    },
    skill: SkillSpec {
        id: "search_products",
        name: "Catálogo de productos",
        description: "Busca productos del catálogo cuya descripción contenga el nombre indicado.",
        tags: &["productos", "catálogo", "búsqueda"],
        examples: &["¿Tienen cafeteras?", "Busca molinillos de café"],
    },
    default_port: 10003,
};
