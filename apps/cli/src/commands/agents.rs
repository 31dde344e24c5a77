//! Agents command implementation.
//!
//! Provides commands for listing, inspecting, searching and checking the
//! capability cards in the registry.

use super::AgentsCommand;
use crate::config::Context;
use colored::Colorize;
use parliament_core::CapabilityCard;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

/// Execute the agents command.
pub fn execute(ctx: &Context, command: AgentsCommand) -> anyhow::Result<()> {
    match command {
        AgentsCommand::List { json } => list_agents(ctx, ctx.json(json)),
        AgentsCommand::Show { name, json } => show_agent(ctx, &name, ctx.json(json)),
        AgentsCommand::Find { strength, json } => find_agents(ctx, &strength, ctx.json(json)),
        AgentsCommand::Check { json } => check_agents(ctx, ctx.json(json)),
    }
}

fn list_agents(ctx: &Context, json_output: bool) -> anyhow::Result<()> {
    let cards: Vec<&CapabilityCard> = ctx.registry.all().collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("{}", "No agents registered.".yellow());
        println!();
        println!("Add cards with --cards <file> or set `cards` in ./.parliamentrc");
        return Ok(());
    }

    println!();
    println!("{}", format!("Found {} agents", cards.len()).bold().green());
    println!();
    display_agents_table(&cards);
    Ok(())
}

fn show_agent(ctx: &Context, name: &str, json_output: bool) -> anyhow::Result<()> {
    let card = ctx.registry.get(name)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(card)?);
        return Ok(());
    }

    println!();
    println!("{}", card.name().bold().cyan());
    println!("  {}", card.description());
    println!();
    println!("  {} {}", "Version:".bold(), card.version());
    println!("  {} {}", "Publisher:".bold(), card.publisher());
    println!("  {} {}", "Context window:".bold(), card.context_window());
    println!("  {} {}", "Strengths:".bold(), join(card.strengths()));
    println!("  {} {}", "Tools:".bold(), join(card.tools()));
    if !card.supported_features().is_empty() {
        println!("  {} {}", "Features:".bold(), join(card.supported_features().keys()));
    }

    let unknown = card.unknown_strengths();
    if !unknown.is_empty() {
        println!();
        println!("  {} no trigger keywords for: {}", "!".yellow(), unknown.join(", "));
    }
    println!();
    Ok(())
}

fn find_agents(ctx: &Context, strength: &str, json_output: bool) -> anyhow::Result<()> {
    let matches = ctx.registry.find_by_strength(strength);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("{}", format!("No agents with a strength matching '{}'", strength).yellow());
        return Ok(());
    }

    display_agents_table(&matches);
    Ok(())
}

fn check_agents(ctx: &Context, json_output: bool) -> anyhow::Result<()> {
    let status = ctx.registry.status();

    if json_output {
        let report = json!({
            "active_agents": status.active_agents,
            "agents": status.agents,
            "unroutable": status.unroutable,
            "ok": status.unroutable.is_empty(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for card in ctx.registry.all() {
            if card.is_routable() {
                println!("  {} {}", "✓".green(), card.name());
            } else {
                println!("  {} {} (unroutable)", "✗".red(), card.name());
            }
            let unknown = card.unknown_strengths();
            if !unknown.is_empty() {
                println!("      unknown strengths: {}", unknown.join(", ").dimmed());
            }
        }
    }

    if !status.unroutable.is_empty() {
        anyhow::bail!("unroutable agents: {}", status.unroutable.join(", "));
    }

    if !json_output {
        println!();
        println!("{}", format!("All {} agents are routable", status.active_agents).green());
    }
    Ok(())
}

fn display_agents_table(cards: &[&CapabilityCard]) {
    #[derive(Tabled)]
    struct AgentRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Publisher")]
        publisher: String,
        #[tabled(rename = "Strengths")]
        strengths: String,
        #[tabled(rename = "Tools")]
        tools: usize,
    }

    let rows: Vec<AgentRow> = cards
        .iter()
        .map(|card| AgentRow {
            name: card.name().to_string(),
            publisher: card.publisher().to_string(),
            strengths: join(card.strengths()),
            tools: card.tools().len(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();

    println!("{}", table);
    println!();
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
