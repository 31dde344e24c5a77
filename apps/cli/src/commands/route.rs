//! Route command implementation.

use crate::config::Context;
use colored::Colorize;
use parliament_core::DecisionType;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

/// Execute the route command.
pub fn execute(ctx: &Context, task: &str, json_output: bool, explain: bool) -> anyhow::Result<()> {
    let decision = ctx.router.route(task, &ctx.registry)?;
    let ranking = explain.then(|| ctx.router.rank(task, &ctx.registry));

    if json_output {
        let mut output = serde_json::to_value(&decision)?;
        if let Some(ranking) = &ranking {
            output["ranking"] = json!(ranking);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let via = match decision.decision_type {
        DecisionType::Matched => format!("score {}", decision.score),
        DecisionType::Fallback => "fallback".to_string(),
    };
    println!("{} ({})", decision.agent.bold().green(), via.dimmed());
    println!("  {}", decision.reasoning);

    if let Some(ranking) = ranking {
        #[derive(Tabled)]
        struct ScoreRow {
            #[tabled(rename = "Agent")]
            agent: String,
            #[tabled(rename = "Score")]
            score: usize,
            #[tabled(rename = "Matched tags")]
            tags: String,
        }

        let rows: Vec<ScoreRow> = ranking
            .into_iter()
            .map(|s| ScoreRow { agent: s.agent, score: s.score, tags: s.matched_tags.join(", ") })
            .collect();

        println!();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    Ok(())
}
