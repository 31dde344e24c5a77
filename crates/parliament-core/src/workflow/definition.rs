//! Workflow definition files.
//!
//! A definition lists steps in file order; each step may only depend on steps
//! listed above it.
//!
//! ```yaml
//! name: release
//! steps:
//!   - id: research
//!     description: Research the APIs
//!     prompt: Find the latest API changes
//!   - id: build
//!     description: Implement integration
//!     prompt: Implement the client
//!     agent: claude-agent
//!     depends_on: [research]
//! ```

use super::graph::{DecompositionStep, WorkflowGraph};
use crate::config::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One step as written in a workflow file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    #[serde(default, alias = "label")]
    pub description: String,
    #[serde(default, alias = "instruction")]
    pub prompt: String,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl From<StepDefinition> for DecompositionStep {
    fn from(def: StepDefinition) -> Self {
        let label = if def.description.is_empty() { def.id.clone() } else { def.description };
        let step = DecompositionStep::new(def.id, label, def.prompt).with_dependencies(def.depends_on);
        match def.agent {
            Some(agent) => step.with_agent(agent),
            None => step,
        }
    }
}

/// A workflow file: an optional name and an ordered step list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

impl WorkflowDefinition {
    /// Loads a definition, choosing the format by file extension.
    ///
    /// `.toml` and `.json` are parsed accordingly; everything else as YAML.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let definition = match extension.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        info!(path = %path.display(), steps = definition.steps.len(), "Loaded workflow definition");
        Ok(definition)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Builds the graph by adding steps in file order.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` for a definition without steps, or the
    /// graph's error for duplicate ids and forward or unknown dependencies.
    pub fn into_graph(self) -> Result<WorkflowGraph> {
        if self.steps.is_empty() {
            return Err(ConfigError::Invalid("workflow defines no steps".to_string()));
        }

        let mut graph = WorkflowGraph::new();
        for step in self.steps {
            graph.add(step.into())?;
        }
        Ok(graph)
    }
}
