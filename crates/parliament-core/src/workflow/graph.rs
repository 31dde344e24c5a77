//! Workflow graph: named steps with dependency edges and level ordering.
//!
//! Steps may only depend on steps that were added before them, so a graph built
//! through [`WorkflowGraph::add_step`] is acyclic by construction.
//! [`WorkflowGraph::execution_order`] still checks the petgraph graph for cycles
//! and reports any steps that cannot be placed.

use crate::error::{ParliamentError, Result};
use crate::routing::TeamMember;
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// One step of a decomposed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionStep {
    /// Unique key within the graph.
    pub step_id: String,
    /// Short human-readable title.
    pub label: String,
    /// The sub-task text.
    pub instruction: String,
    /// Steps that must complete first.
    #[serde(default)]
    pub depends_on: BTreeSet<String>,
    /// Explicitly assigned agent; routed from `instruction` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl DecompositionStep {
    /// Creates a step with no dependencies and no assigned agent.
    pub fn new(
        step_id: impl Into<String>,
        label: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            label: label.into(),
            instruction: instruction.into(),
            depends_on: BTreeSet::new(),
            agent: None,
        }
    }

    #[must_use]
    pub fn with_dependencies<I, S>(mut self, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(depends_on.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}

/// Serializable view of a graph and its level ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSummary<'a> {
    pub steps: &'a [DecompositionStep],
    pub execution_order: Vec<Vec<String>>,
}

/// Append-only dependency graph of decomposition steps.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    /// Edges run from a dependency to its dependent.
    graph: DiGraph<String, ()>,
    /// Mapping from step id to node index.
    node_map: HashMap<String, NodeIndex>,
    /// Steps in insertion order; `steps[i]` is node `i`.
    steps: Vec<DecompositionStep>,
}

impl WorkflowGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a step built from its parts.
    ///
    /// # Errors
    /// See [`WorkflowGraph::add`].
    pub fn add_step<I, S>(
        &mut self,
        step_id: &str,
        label: &str,
        instruction: &str,
        depends_on: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(DecompositionStep::new(step_id, label, instruction).with_dependencies(depends_on))
    }

    /// Adds a step. The graph is left untouched on error.
    ///
    /// # Errors
    /// - `ParliamentError::Validation` if the step id is empty
    /// - `ParliamentError::DuplicateStep` if the id is already present
    /// - `ParliamentError::UnknownDependency` if a dependency was not added yet
    pub fn add(&mut self, step: DecompositionStep) -> Result<&mut Self> {
        if step.step_id.trim().is_empty() {
            return Err(ParliamentError::Validation("workflow step id must not be empty".to_string()));
        }
        if self.node_map.contains_key(&step.step_id) {
            return Err(ParliamentError::DuplicateStep(step.step_id));
        }
        if let Some(missing) = step.depends_on.iter().find(|dep| !self.node_map.contains_key(*dep))
        {
            return Err(ParliamentError::UnknownDependency {
                step: step.step_id.clone(),
                dependency: missing.clone(),
            });
        }

        debug!(step = %step.step_id, depends_on = ?step.depends_on, "Adding workflow step");
        self.insert(step);
        Ok(self)
    }

    /// Adds the node and every edge between it and steps already present.
    fn insert(&mut self, step: DecompositionStep) {
        let node = self.graph.add_node(step.step_id.clone());

        for dep in &step.depends_on {
            if let Some(&dep_node) = self.node_map.get(dep) {
                self.graph.add_edge(dep_node, node, ());
            }
        }
        // Only reachable when a step was inserted ahead of its dependency.
        for (position, existing) in self.steps.iter().enumerate() {
            if existing.depends_on.contains(&step.step_id) {
                self.graph.add_edge(node, NodeIndex::new(position), ());
            }
        }

        self.node_map.insert(step.step_id.clone(), node);
        self.steps.push(step);
    }

    /// Groups steps into execution levels.
    ///
    /// Level 0 holds every step without dependencies; level k holds every
    /// remaining step whose dependencies all sit in earlier levels. Steps within
    /// a level may run concurrently and are listed in insertion order.
    ///
    /// # Errors
    /// Returns `ParliamentError::UnknownDependency` for a dangling dependency
    /// and `ParliamentError::CycleDetected` with the unresolved steps if the
    /// dependency relation is cyclic.
    pub fn execution_order(&self) -> Result<Vec<Vec<String>>> {
        for step in &self.steps {
            if let Some(missing) = step.depends_on.iter().find(|d| !self.node_map.contains_key(*d))
            {
                return Err(ParliamentError::UnknownDependency {
                    step: step.step_id.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        let (levels, unresolved) = self.peel_levels();

        if is_cyclic_directed(&self.graph) || !unresolved.is_empty() {
            let unresolved: Vec<String> =
                unresolved.into_iter().map(|node| self.graph[node].clone()).collect();
            warn!(steps = ?unresolved, "Cycle detected in workflow graph");
            return Err(ParliamentError::CycleDetected(unresolved));
        }

        Ok(levels
            .into_iter()
            .map(|level| level.into_iter().map(|node| self.graph[node].clone()).collect())
            .collect())
    }

    /// Removes nodes without remaining incoming edges, one level at a time.
    ///
    /// Returns the levels and the nodes left over, which all sit on or behind a
    /// cycle. Each level is sorted by node index, i.e. insertion order.
    fn peel_levels(&self) -> (Vec<Vec<NodeIndex>>, Vec<NodeIndex>) {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|node| (node, self.graph.neighbors_directed(node, Direction::Incoming).count()))
            .collect();

        let mut frontier: Vec<NodeIndex> =
            self.graph.node_indices().filter(|node| in_degree[node] == 0).collect();
        let mut levels = Vec::new();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &node in &frontier {
                in_degree.remove(&node);
                for dependent in self.graph.neighbors_directed(node, Direction::Outgoing) {
                    if let Some(degree) = in_degree.get_mut(&dependent) {
                        *degree -= 1;
                        if *degree == 0 {
                            next.push(dependent);
                        }
                    }
                }
            }
            levels.push(frontier);
            next.sort_unstable();
            next.dedup();
            frontier = next;
        }

        let mut unresolved: Vec<NodeIndex> = in_degree.into_keys().collect();
        unresolved.sort_unstable();
        (levels, unresolved)
    }

    /// Builds a linear workflow from a team suggestion.
    ///
    /// Each phase becomes a step keyed by its label that depends on the previous
    /// phase and is assigned to the suggested agent.
    pub fn from_team(task: &str, team: &[TeamMember]) -> Result<Self> {
        let mut graph = Self::new();
        let mut previous: Option<String> = None;

        for member in team {
            let step_id = member.phase.label().to_string();
            let step = DecompositionStep::new(
                step_id.clone(),
                member.subtask.clone(),
                format!("{}: {}", member.subtask, task),
            )
            .with_dependencies(previous.take())
            .with_agent(member.agent.clone());

            graph.add(step)?;
            previous = Some(step_id);
        }

        Ok(graph)
    }

    /// Serializable summary of the steps and their level ordering.
    pub fn summary(&self) -> Result<WorkflowSummary<'_>> {
        Ok(WorkflowSummary { steps: &self.steps, execution_order: self.execution_order()? })
    }

    pub fn get(&self, step_id: &str) -> Option<&DecompositionStep> {
        self.node_map.get(step_id).map(|node| &self.steps[node.index()])
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.node_map.contains_key(step_id)
    }

    /// Steps in insertion order.
    pub fn steps(&self) -> &[DecompositionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Serialize for WorkflowGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.summary().map_err(serde::ser::Error::custom)?.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Phase;
    use std::collections::HashSet;

    fn no_deps() -> Vec<String> {
        Vec::new()
    }

    fn diamond() -> WorkflowGraph {
        let mut graph = WorkflowGraph::new();
        graph
            .add_step("A", "Research", "Gather sources", no_deps())
            .unwrap()
            .add_step("B", "Backend", "Implement API", ["A"])
            .unwrap()
            .add_step("C", "Frontend", "Implement UI", ["A"])
            .unwrap()
            .add_step("D", "Verify", "Run tests", ["B", "C"])
            .unwrap();
        graph
    }

    fn as_sets(levels: Vec<Vec<String>>) -> Vec<HashSet<String>> {
        levels.into_iter().map(|level| level.into_iter().collect()).collect()
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_diamond_execution_levels() {
        let levels = diamond().execution_order().unwrap();
        assert_eq!(as_sets(levels), vec![set(&["A"]), set(&["B", "C"]), set(&["D"])]);
    }

    #[test]
    fn test_levels_list_steps_in_insertion_order() {
        let levels = diamond().execution_order().unwrap();
        assert_eq!(levels[1], vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_unequal_path_lengths() {
        let mut graph = WorkflowGraph::new();
        graph
            .add_step("a", "a", "", no_deps())
            .unwrap()
            .add_step("b", "b", "", ["a"])
            .unwrap()
            .add_step("c", "c", "", ["b"])
            .unwrap()
            .add_step("d", "d", "", ["a", "c"])
            .unwrap()
            .add_step("e", "e", "", no_deps())
            .unwrap();

        let levels = graph.execution_order().unwrap();
        assert_eq!(as_sets(levels), vec![set(&["a", "e"]), set(&["b"]), set(&["c"]), set(&["d"])]);
    }

    #[test]
    fn test_dependency_edges_point_at_dependents() {
        let graph = diamond();
        assert_eq!(graph.graph.edge_count(), 4);

        let a = graph.node_map["A"];
        let dependents: HashSet<String> = graph
            .graph
            .neighbors_directed(a, Direction::Outgoing)
            .map(|node| graph.graph[node].clone())
            .collect();
        assert_eq!(dependents, set(&["B", "C"]));

        let d = graph.node_map["D"];
        assert_eq!(graph.graph.neighbors_directed(d, Direction::Incoming).count(), 2);
        assert!(!is_cyclic_directed(&graph.graph));
    }

    #[test]
    fn test_empty_graph_has_no_levels() {
        assert!(WorkflowGraph::new().execution_order().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_step_rejected() {
        let mut graph = diamond();
        let result = graph.add_step("B", "Again", "", no_deps());
        assert_eq!(result.unwrap_err(), ParliamentError::DuplicateStep("B".to_string()));
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_unknown_dependency_rejected_without_mutation() {
        let mut graph = diamond();
        let result = graph.add_step("E", "Deploy", "Ship it", ["D", "Z"]);
        assert_eq!(
            result.unwrap_err(),
            ParliamentError::UnknownDependency { step: "E".to_string(), dependency: "Z".to_string() }
        );
        assert_eq!(graph.len(), 4);
        assert!(!graph.contains("E"));
        assert_eq!(graph.execution_order().unwrap().len(), 3);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut graph = WorkflowGraph::new();
        let result = graph.add_step("loop", "Loop", "", ["loop"]);
        assert!(matches!(result, Err(ParliamentError::UnknownDependency { .. })));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_empty_step_id_rejected() {
        let mut graph = WorkflowGraph::new();
        let result = graph.add_step(" ", "Blank", "", no_deps());
        assert!(matches!(result, Err(ParliamentError::Validation(_))));
    }

    #[test]
    fn test_cycle_detected_when_discipline_bypassed() {
        let mut graph = WorkflowGraph::new();
        graph.add_step("start", "Start", "", no_deps()).unwrap();
        graph.insert(DecompositionStep::new("x", "X", "").with_dependencies(["y"]));
        graph.insert(DecompositionStep::new("y", "Y", "").with_dependencies(["x", "start"]));
        graph.insert(DecompositionStep::new("z", "Z", "").with_dependencies(["y"]));
        assert!(is_cyclic_directed(&graph.graph));

        let result = graph.execution_order();
        assert_eq!(
            result.unwrap_err(),
            ParliamentError::CycleDetected(vec!["x".to_string(), "y".to_string(), "z".to_string()])
        );
    }

    #[test]
    fn test_dangling_dependency_when_discipline_bypassed() {
        let mut graph = WorkflowGraph::new();
        graph.insert(DecompositionStep::new("x", "X", "").with_dependencies(["ghost"]));
        assert!(matches!(
            graph.execution_order(),
            Err(ParliamentError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_from_team_chains_phases() {
        let team = vec![
            TeamMember {
                agent: "gemini-agent".to_string(),
                phase: Phase::Research,
                subtask: Phase::Research.subtask().to_string(),
                score: 1,
                matched_tags: vec!["search-grounding".to_string()],
                reasoning: "matched tag: search-grounding".to_string(),
            },
            TeamMember {
                agent: "goose-agent".to_string(),
                phase: Phase::Deploy,
                subtask: Phase::Deploy.subtask().to_string(),
                score: 2,
                matched_tags: vec![],
                reasoning: String::new(),
            },
        ];

        let graph = WorkflowGraph::from_team("Ship the docs site", &team).unwrap();
        assert_eq!(
            graph.execution_order().unwrap(),
            vec![vec!["research".to_string()], vec!["deploy".to_string()]]
        );

        let deploy = graph.get("deploy").unwrap();
        assert_eq!(deploy.agent.as_deref(), Some("goose-agent"));
        assert!(deploy.depends_on.contains("research"));
        assert_eq!(deploy.instruction, "Run the deployment workflow: Ship the docs site");
    }

    #[test]
    fn test_summary_serializes_steps_and_order() {
        let graph = diamond();
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json, serde_json::to_value(graph.summary().unwrap()).unwrap());
        assert_eq!(json["steps"].as_array().unwrap().len(), 4);
        assert_eq!(json["execution_order"][2][0], "D");
        assert!(json["steps"][0].get("agent").is_none());
    }
}
