//! Team command implementation.

use crate::config::Context;
use colored::Colorize;
use parliament_core::suggest_team;
use tabled::{Table, Tabled, settings::Style};

/// Execute the team command.
pub fn execute(ctx: &Context, task: &str, json_output: bool) -> anyhow::Result<()> {
    let team = suggest_team(task, &ctx.registry)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&team)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct MemberRow {
        #[tabled(rename = "Phase")]
        phase: String,
        #[tabled(rename = "Agent")]
        agent: String,
        #[tabled(rename = "Subtask")]
        subtask: String,
        #[tabled(rename = "Reasoning")]
        reasoning: String,
    }

    let rows: Vec<MemberRow> = team
        .into_iter()
        .map(|m| MemberRow {
            phase: m.phase.to_string(),
            agent: m.agent,
            subtask: m.subtask,
            reasoning: m.reasoning,
        })
        .collect();

    println!();
    println!("{}", format!("Suggested team ({} phases)", rows.len()).bold().green());
    println!();
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!();
    Ok(())
}
