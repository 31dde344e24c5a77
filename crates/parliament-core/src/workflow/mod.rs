//! Workflow decomposition: step graphs, level ordering and dispatch plans.

pub mod definition;
pub mod graph;
pub mod plan;

pub use definition::{StepDefinition, WorkflowDefinition};
pub use graph::{DecompositionStep, WorkflowGraph, WorkflowSummary};
pub use plan::Assignment;
