//! Workflow command implementation.
//!
//! Loads workflow files, prints their execution levels and dispatch plans, and
//! turns team suggestions into workflows.

use super::WorkflowCommand;
use crate::config::Context;
use anyhow::Context as _;
use colored::Colorize;
use parliament_core::{WorkflowDefinition, WorkflowGraph, suggest_team};
use serde_json::json;
use std::path::Path;

/// Execute the workflow command.
pub fn execute(ctx: &Context, command: WorkflowCommand) -> anyhow::Result<()> {
    match command {
        WorkflowCommand::Order { file, json } => show_order(&load_graph(&file)?, ctx.json(json)),
        WorkflowCommand::Plan { file, json } => show_plan(ctx, &load_graph(&file)?, ctx.json(json)),
        WorkflowCommand::FromTeam { task, json } => from_team(ctx, &task.join(" "), ctx.json(json)),
    }
}

fn load_graph(path: &Path) -> anyhow::Result<WorkflowGraph> {
    let definition = WorkflowDefinition::load(path)
        .with_context(|| format!("failed to load workflow {}", path.display()))?;
    Ok(definition.into_graph()?)
}

fn show_order(graph: &WorkflowGraph, json_output: bool) -> anyhow::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(graph)?);
        return Ok(());
    }

    let levels = graph.execution_order()?;
    println!();
    println!(
        "{}",
        format!("{} steps in {} levels", graph.len(), levels.len()).bold().green()
    );
    println!();
    for (index, level) in levels.iter().enumerate() {
        println!("  {} {}", format!("Level {}:", index).bold(), level.join(", "));
    }
    println!();
    Ok(())
}

fn show_plan(ctx: &Context, graph: &WorkflowGraph, json_output: bool) -> anyhow::Result<()> {
    let plan = graph.dispatch_plan(&ctx.registry, &ctx.router)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&json!({ "levels": plan }))?);
        return Ok(());
    }

    println!();
    for (index, level) in plan.iter().enumerate() {
        println!("{}", format!("Level {}", index).bold());
        for assignment in level {
            println!(
                "  {:<16} -> {:<16} {}",
                assignment.step_id,
                assignment.agent.green(),
                assignment.reasoning.dimmed()
            );
        }
    }
    println!();
    Ok(())
}

fn from_team(ctx: &Context, task: &str, json_output: bool) -> anyhow::Result<()> {
    let team = suggest_team(task, &ctx.registry)?;
    let graph = WorkflowGraph::from_team(task, &team)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&graph)?);
        return Ok(());
    }

    println!();
    for step in graph.steps() {
        let agent = step.agent.as_deref().unwrap_or("-");
        let after = if step.depends_on.is_empty() {
            String::new()
        } else {
            format!(" (after {})", step.depends_on.iter().cloned().collect::<Vec<_>>().join(", "))
        };
        println!("  {} {} {}{}", step.step_id.bold(), agent.green(), step.label, after.dimmed());
    }
    println!();
    Ok(())
}
