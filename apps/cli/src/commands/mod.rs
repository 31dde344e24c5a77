//! Command implementations for the Parliament CLI.

pub mod agents;
pub mod route;
pub mod team;
pub mod triggers;
pub mod types;
pub mod workflow;

pub use types::{AgentsCommand, WorkflowCommand};
