//! Core of the agent parliament.
//!
//! A parliament is a set of heterogeneous CLI agents described by capability
//! cards. This crate provides:
//!
//! - [`cards`]: capability cards, card-set files and the agent registry
//! - [`routing`]: keyword routing of a task to one agent and phase-based team
//!   suggestions
//! - [`workflow`]: step graphs with dependency validation, level ordering and
//!   dispatch plans
//! - [`config`]: configuration discovery and registry construction
//!
//! # Example
//!
//! ```
//! use parliament_core::{CardSet, Router};
//!
//! let registry = CardSet::builtin()?.into_registry()?;
//! let decision = Router::new().route("Find the latest Rust release notes", &registry)?;
//! assert_eq!(decision.agent, "gemini-agent");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cards;
pub mod config;
pub mod error;
pub mod routing;
pub mod workflow;

pub use cards::{CapabilityCard, CardSet, MeshStatus, Registry, SharedRegistry};
pub use config::{ConfigError, ParliamentConfig};
pub use error::{ParliamentError, Result};
pub use routing::{
    AgentScore, DecisionType, Phase, Router, RoutingDecision, TeamMember, route, suggest_team,
};
pub use workflow::{Assignment, DecompositionStep, WorkflowDefinition, WorkflowGraph};
