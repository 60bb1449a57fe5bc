// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use helpdesk_a2a::{spawn_execution, Event, Message, Part, RequestContext};
use helpdesk_agents::{AgentKind, DomainAgent, DomainExecutor};
use helpdesk_config::Config;
use helpdesk_tools::{search_faqs, search_orders, search_products, RequestIdLog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Completions { shell } => {
            cli::print_completions(shell);
            Ok(())
        }
        Commands::Card { agent, url } => {
            let card = agent.card(url.as_deref());
            println!("{}", serde_json::to_string_pretty(&card)?);
            Ok(())
        }
        Commands::ShowConfig => {
            let config = helpdesk_config::load(cli.config.as_deref())?;
            println!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        Commands::Search { agent, key } => {
            let config = helpdesk_config::load(cli.config.as_deref())?;
            search(&config, agent, key.as_deref()).await
        }
        Commands::Ask { agent, query, session, json } => {
            let config = helpdesk_config::load(cli.config.as_deref())?;
            ask(&config, agent, query, session, json).await
        }
    }
}

async fn search(config: &Config, agent: AgentKind, key: Option<&str>) -> anyhow::Result<()> {
    let path = agent.data_path(&config.data);
    let key = key.map(str::to_string);
    debug!(%agent, path = %path.display(), "direct lookup");
    let value = tokio::task::spawn_blocking(move || {
        let log = RequestIdLog::global();
        match agent {
            AgentKind::Faqs => serde_json::to_value(search_faqs(&path, key.as_deref().unwrap_or(""), &log)),
            AgentKind::Orders => serde_json::to_value(search_orders(&path, key.as_deref(), &log)),
            AgentKind::Products => serde_json::to_value(search_products(&path, key.as_deref(), &log)),
        }
    })
    .await
    .context("lookup task panicked")??;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn ask(
    config: &Config,
    agent: AgentKind,
    query: String,
    session: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let domain = DomainAgent::from_config(agent, config)
        .with_context(|| format!("building the {agent} agent"))?;
    let executor = Arc::new(DomainExecutor::new(domain));

    let mut message = Message::user_text(query);
    message.context_id = Some(session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()));
    info!(%agent, session = ?message.context_id, "sending query");

    let mut execution = spawn_execution(executor, RequestContext::new(message, None));
    while let Some(event) = execution.events.next().await {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            print_event(&event);
        }
    }
    execution.handle.await.context("executor task panicked")??;
    Ok(())
}

fn print_event(event: &Event) {
    match event {
        Event::Task(t) => println!("[task {}] contexto {}", t.id, t.context_id),
        Event::Message(m) => println!("[message] {}", m.text("\n")),
        Event::StatusUpdate(u) => {
            let text = u.status.message.as_ref().map(|m| m.text("\n")).unwrap_or_default();
            println!("[{}] {}", u.status.state, text);
        }
        Event::ArtifactUpdate(u) => {
            let name = u.artifact.name.as_deref().unwrap_or("artifact");
            for part in &u.artifact.parts {
                match part {
                    Part::Text { text } => println!("[{name}] {text}"),
                    Part::Data { data } => println!(
                        "[{name}] {}",
                        serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
                    ),
                }
            }
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
