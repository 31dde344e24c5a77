//! Parliament CLI - route tasks across a parliament of CLI agents
//!
//! This CLI provides a `parliament` command over the capability registry,
//! keyword router, team suggester and workflow graph of `parliament-core`.

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

use commands::{AgentsCommand, WorkflowCommand, agents, route, team, triggers, workflow};

/// Parliament CLI - deterministic routing for heterogeneous coding agents
///
/// Picks the agent whose declared strengths best match a task, suggests a team
/// for composite tasks and orders multi-step workflows.
#[derive(Parser, Debug)]
#[command(
    name = "parliament",
    author,
    version,
    about = "Parliament - capability routing for CLI agents",
    long_about = "Parliament matches free-text tasks against static agent capability cards.\nRouting is keyword based, deterministic and explainable."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Configuration file (replaces ~/.parliament/config.toml and ./.parliamentrc)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Extra card-set file (TOML or JSON) layered over the built-in cards
    #[arg(long, global = true)]
    cards: Option<PathBuf>,

    /// Do not load the built-in cards
    #[arg(long, global = true)]
    no_builtin: bool,

    /// Agent to use when no strength tag matches
    #[arg(long, global = true)]
    fallback: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect registered agents
    ///
    /// List, show, search and check the capability cards in the registry.
    #[command(subcommand)]
    Agents(AgentsCommand),

    /// Route a task to the best matching agent
    Route {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show every agent's score
        #[arg(long)]
        explain: bool,
    },

    /// Suggest a team for a composite task
    ///
    /// Splits the task into research, implement, verify and deploy phases and
    /// pairs each detected phase with its best agent.
    Team {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Order and plan multi-step workflows
    #[command(subcommand)]
    Workflow(WorkflowCommand),

    /// Print the keyword tables used for routing
    Triggers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parses a log level name, falling back to `WARN`.
fn parse_level(level: Option<&str>) -> LevelFilter {
    level.and_then(|l| l.parse::<LevelFilter>().ok()).unwrap_or(LevelFilter::WARN)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing before loading config
    let (filter, reload_handle) = reload::Layer::new(parse_level(args.log_level.as_deref()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time().with_target(false))
        .try_init()?;

    let overrides = config::Overrides {
        config: args.config,
        cards: args.cards,
        no_builtin: args.no_builtin,
        fallback: args.fallback,
    };
    let cli_config = config::load_config(&overrides)?;

    // --log-level wins over the configured level
    if args.log_level.is_none() && cli_config.log_level.is_some() {
        reload_handle.reload(parse_level(cli_config.log_level.as_deref()))?;
    }

    // If no command provided, show help
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let ctx = config::Context::from_config(&cli_config)?;

    match command {
        Command::Agents(cmd) => agents::execute(&ctx, cmd),
        Command::Route { task, json, explain } => {
            route::execute(&ctx, &task.join(" "), ctx.json(json), explain)
        }
        Command::Team { task, json } => team::execute(&ctx, &task.join(" "), ctx.json(json)),
        Command::Workflow(cmd) => workflow::execute(&ctx, cmd),
        Command::Triggers { json } => triggers::execute(ctx.json(json)),
    }
}
