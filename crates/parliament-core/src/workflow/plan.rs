//! Dispatch plans: execution levels with an agent assigned to every step.

use super::graph::WorkflowGraph;
use crate::cards::Registry;
use crate::error::{ParliamentError, Result};
use crate::routing::Router;
use serde::Serialize;
use tracing::debug;

/// Agent assignment for one workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub step_id: String,
    pub agent: String,
    pub reasoning: String,
}

impl WorkflowGraph {
    /// Assigns an agent to every step, grouped by execution level.
    ///
    /// Steps with an explicit agent keep it after a registry check; all others
    /// are routed on their instruction text.
    ///
    /// # Errors
    /// Returns ordering errors from [`WorkflowGraph::execution_order`],
    /// `ParliamentError::NotFound` for an unregistered explicit agent, or the
    /// router's error for a step nothing matches.
    pub fn dispatch_plan(
        &self,
        registry: &Registry,
        router: &Router,
    ) -> Result<Vec<Vec<Assignment>>> {
        let levels = self.execution_order()?;
        let mut plan = Vec::with_capacity(levels.len());

        for level in levels {
            let mut assignments = Vec::with_capacity(level.len());
            for step_id in level {
                let step = self.get(&step_id).ok_or_else(|| {
                    ParliamentError::Validation(format!("unknown step '{step_id}'"))
                })?;

                let (agent, reasoning) = match &step.agent {
                    Some(agent) => {
                        registry.get(agent)?;
                        (agent.clone(), "assigned in workflow".to_string())
                    }
                    None => {
                        let text =
                            if step.instruction.is_empty() { &step.label } else { &step.instruction };
                        let decision = router.route(text, registry)?;
                        (decision.agent, decision.reasoning)
                    }
                };

                debug!(step = %step_id, agent = %agent, "Assigned workflow step");
                assignments.push(Assignment { step_id, agent, reasoning });
            }
            plan.push(assignments);
        }

        Ok(plan)
    }
}
