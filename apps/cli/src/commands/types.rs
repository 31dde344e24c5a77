//! Command type definitions shared between main.rs and the command modules.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum AgentsCommand {
    /// List all registered agents
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one agent's capability card
    Show {
        /// Agent name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find agents by strength tag (substring, case-insensitive)
    Find {
        /// Strength fragment, e.g. "git" or "reasoning"
        strength: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every card can win a routing decision
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum WorkflowCommand {
    /// Print the execution levels of a workflow file
    Order {
        /// Workflow file (YAML, TOML or JSON)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign an agent to every step of a workflow file
    Plan {
        /// Workflow file (YAML, TOML or JSON)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a workflow from a team suggestion
    FromTeam {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
