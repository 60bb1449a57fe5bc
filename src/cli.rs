// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use helpdesk_agents::AgentKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "helpdesk",
    about = "FAQ, order and product-catalog help-desk agents",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (layered on top of the discovered ones)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a query to an agent and print the task updates it publishes
    Ask {
        /// faqs, orders or products (or the full agent name)
        agent: AgentKind,
        /// The customer's question
        query: String,
        /// Conversation id; a fresh one is generated when omitted
        #[arg(long, short = 's', value_name = "ID")]
        session: Option<String>,
        /// Print every event as one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Run an agent's lookup tool directly and print its JSON result
    Search {
        agent: AgentKind,
        /// FAQ query, order id or product name; omit to list everything
        key: Option<String>,
    },
    /// Print an agent's card as JSON
    Card {
        agent: AgentKind,
        /// Endpoint advertised on the card
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "helpdesk", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_parses_agent_and_flags() {
        let cli = Cli::try_parse_from(["helpdesk", "-v", "ask", "orders", "¿mi pedido?", "--session", "s1", "--json"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Ask { agent, query, session, json } => {
                assert_eq!(agent, AgentKind::Orders);
                assert_eq!(query, "¿mi pedido?");
                assert_eq!(session.as_deref(), Some("s1"));
                assert!(json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_agent_is_rejected() {
        assert!(Cli::try_parse_from(["helpdesk", "card", "billing"]).is_err());
    }

    #[test]
    fn search_key_is_optional() {
        let cli = Cli::try_parse_from(["helpdesk", "search", "products"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { agent: AgentKind::Products, key: None }));
    }
}
