//! Triggers command implementation.
//!
//! Prints the two keyword tables that drive routing and team suggestions.

use colored::Colorize;
use parliament_core::routing::{PHASE_TRIGGERS, STRENGTH_TRIGGERS};
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

/// Execute the triggers command.
pub fn execute(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let tables = json!({
            "strength_triggers": STRENGTH_TRIGGERS,
            "phase_triggers": PHASE_TRIGGERS,
        });
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct StrengthRow {
        #[tabled(rename = "Strength tag")]
        tag: &'static str,
        #[tabled(rename = "Keywords")]
        keywords: String,
    }

    #[derive(Tabled)]
    struct PhaseRow {
        #[tabled(rename = "Phase")]
        phase: String,
        #[tabled(rename = "Markers")]
        markers: String,
        #[tabled(rename = "Window")]
        window: String,
    }

    let strengths: Vec<StrengthRow> = STRENGTH_TRIGGERS
        .iter()
        .map(|t| StrengthRow { tag: t.tag, keywords: t.keywords.join(", ") })
        .collect();

    let phases: Vec<PhaseRow> = PHASE_TRIGGERS
        .iter()
        .map(|t| PhaseRow {
            phase: t.phase.to_string(),
            markers: t.markers.join(", "),
            window: t.window.join(", "),
        })
        .collect();

    println!("{}", "Strength triggers".bold());
    println!("{}", Table::new(strengths).with(Style::rounded()));
    println!();
    println!("{}", "Phase markers".bold());
    println!("{}", Table::new(phases).with(Style::rounded()));
    Ok(())
}
