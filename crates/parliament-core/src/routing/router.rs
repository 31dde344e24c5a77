//! Task router: picks the registered agent whose strengths best match a task.

use super::triggers::{self, TokenSet};
use crate::cards::{CapabilityCard, Registry};
use crate::error::{ParliamentError, Result};
use serde::Serialize;
use tracing::debug;

/// How a routing decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    /// At least one strength tag matched.
    Matched,
    /// Nothing matched and the configured fallback agent was used.
    Fallback,
}

/// Score of one agent for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentScore {
    /// Agent name.
    pub agent: String,
    /// Number of the agent's strength tags triggered by the task.
    pub score: usize,
    /// The triggered tags, sorted.
    pub matched_tags: Vec<String>,
}

impl AgentScore {
    /// Reproducible justification naming the deciding tags.
    pub fn reasoning(&self) -> String {
        match self.matched_tags.as_slice() {
            [] => "no strength tag matched".to_string(),
            [tag] => format!("matched tag: {tag}"),
            tags => format!("matched tags: {}", tags.join(", ")),
        }
    }
}

/// The router's answer for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    /// Selected agent name.
    pub agent: String,
    /// Short justification, e.g. `matched tag: search-grounding`.
    pub reasoning: String,
    /// Winning score (zero for fallback decisions).
    pub score: usize,
    /// Tags that decided the match.
    pub matched_tags: Vec<String>,
    /// Whether the decision came from a match or the fallback.
    pub decision_type: DecisionType,
}

impl From<AgentScore> for RoutingDecision {
    fn from(score: AgentScore) -> Self {
        Self {
            reasoning: score.reasoning(),
            agent: score.agent,
            score: score.score,
            matched_tags: score.matched_tags,
            decision_type: DecisionType::Matched,
        }
    }
}

/// Scores one card against a token set.
pub fn score_card(card: &CapabilityCard, tokens: &TokenSet) -> AgentScore {
    let matched_tags: Vec<String> = card
        .strengths()
        .iter()
        .filter(|tag| {
            triggers::triggers_for(tag).is_some_and(|keywords| tokens.contains_any(keywords))
        })
        .cloned()
        .collect();

    AgentScore { agent: card.name().to_string(), score: matched_tags.len(), matched_tags }
}

/// Scores every registered card, in registry insertion order.
pub fn score_tokens(tokens: &TokenSet, registry: &Registry) -> Vec<AgentScore> {
    registry.all().map(|card| score_card(card, tokens)).collect()
}

/// Highest non-zero score; ties go to the earliest registered agent.
pub fn best_match(tokens: &TokenSet, registry: &Registry) -> Option<AgentScore> {
    let mut best: Option<AgentScore> = None;
    for candidate in score_tokens(tokens, registry) {
        if candidate.score == 0 {
            continue;
        }
        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

/// Routes a task with no fallback.
///
/// # Errors
/// Returns `ParliamentError::NoMatch` when every agent scores zero.
pub fn route(task: &str, registry: &Registry) -> Result<RoutingDecision> {
    Router::new().route(task, registry)
}

/// Deterministic keyword router with an optional caller-supplied fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    /// Agent used when nothing matches. Never invented by the router itself.
    fallback: Option<String>,
}

impl Router {
    /// Creates a router without a fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the agent to use when no strength tag matches.
    #[must_use]
    pub fn with_fallback(mut self, agent: impl Into<String>) -> Self {
        self.fallback = Some(agent.into());
        self
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Routes a task description to the best matching agent.
    ///
    /// Score is the count of the agent's strength tags whose trigger keywords
    /// appear in the task. Highest score wins; ties go to the agent registered
    /// first.
    ///
    /// # Errors
    /// Returns `ParliamentError::NoMatch` if every score is zero and no fallback
    /// is configured, or `ParliamentError::NotFound` if the fallback agent is
    /// not registered.
    pub fn route(&self, task: &str, registry: &Registry) -> Result<RoutingDecision> {
        let tokens = TokenSet::from_text(task);

        if let Some(best) = best_match(&tokens, registry) {
            let decision = RoutingDecision::from(best);
            debug!(
                agent = %decision.agent,
                score = decision.score,
                tags = ?decision.matched_tags,
                "Routed task"
            );
            return Ok(decision);
        }

        if let Some(fallback) = &self.fallback {
            let card = registry.get(fallback)?;
            debug!(agent = %card.name(), "No strength matched, using configured fallback");
            return Ok(RoutingDecision {
                agent: card.name().to_string(),
                reasoning: "fallback: no strength tag matched".to_string(),
                score: 0,
                matched_tags: Vec::new(),
                decision_type: DecisionType::Fallback,
            });
        }

        Err(no_match(task, registry))
    }

    /// Scores every agent for a task, winner first.
    ///
    /// Sorted by score descending, then by registry insertion order.
    pub fn rank(&self, task: &str, registry: &Registry) -> Vec<AgentScore> {
        let tokens = TokenSet::from_text(task);
        let mut scores = score_tokens(&tokens, registry);
        // Stable sort keeps insertion order among equal scores.
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores
    }
}

fn no_match(task: &str, registry: &Registry) -> ParliamentError {
    if registry.is_empty() {
        ParliamentError::NoMatch("no agents registered".to_string())
    } else {
        ParliamentError::NoMatch(format!("no strength tag matched task '{task}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::from_cards([
            CapabilityCard::new("gemini-agent", "Google").with_strengths(["search-grounding"]),
            CapabilityCard::new("aider-agent", "Aider").with_strengths(["git-integration"]),
            CapabilityCard::new("claude-agent", "Anthropic").with_strengths(["deep-reasoning"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_route_search_task() {
        let decision = route("Find latest Python 3.13 features", &registry()).unwrap();
        assert_eq!(decision.agent, "gemini-agent");
        assert_eq!(decision.reasoning, "matched tag: search-grounding");
        assert_eq!(decision.decision_type, DecisionType::Matched);
    }

    #[test]
    fn test_route_git_task() {
        let decision = route("Refactor auth module and commit", &registry()).unwrap();
        assert_eq!(decision.agent, "aider-agent");
        assert_eq!(decision.reasoning, "matched tag: git-integration");
    }

    #[test]
    fn test_route_empty_registry_fails() {
        let result = route("Find latest news", &Registry::new());
        assert_eq!(
            result.unwrap_err(),
            ParliamentError::NoMatch("no agents registered".to_string())
        );
    }

    #[test]
    fn test_route_no_keywords_fails() {
        let result = route("Say hello", &registry());
        assert!(matches!(result, Err(ParliamentError::NoMatch(_))));
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let registry = Registry::from_cards([
            CapabilityCard::new("second-agent", "").with_strengths(["git-integration"]),
            CapabilityCard::new("first-agent", "").with_strengths(["deep-reasoning"]),
        ])
        .unwrap();

        // One tag each: "commit" and "design".
        let decision = route("Design the schema then commit", &registry).unwrap();
        assert_eq!(decision.agent, "second-agent");
    }

    #[test]
    fn test_higher_score_beats_insertion_order() {
        let registry = Registry::from_cards([
            CapabilityCard::new("aider-agent", "").with_strengths(["git-integration"]),
            CapabilityCard::new("claude-agent", "").with_strengths(["deep-reasoning", "coding"]),
        ])
        .unwrap();

        let decision = route("Design an algorithm and implement the code, then commit", &registry)
            .unwrap();
        assert_eq!(decision.agent, "claude-agent");
        assert_eq!(decision.score, 2);
        assert_eq!(decision.reasoning, "matched tags: coding, deep-reasoning");
    }

    #[test]
    fn test_route_is_deterministic() {
        let registry = registry();
        let task = "Search the web and refactor the repository";
        let first = route(task, &registry).unwrap();
        for _ in 0..10 {
            assert_eq!(route(task, &registry).unwrap(), first);
        }
    }

    #[test]
    fn test_fallback_used_only_when_nothing_matches() {
        let router = Router::new().with_fallback("claude-agent");
        let registry = registry();

        let fallback = router.route("Say hello", &registry).unwrap();
        assert_eq!(fallback.agent, "claude-agent");
        assert_eq!(fallback.decision_type, DecisionType::Fallback);
        assert_eq!(fallback.reasoning, "fallback: no strength tag matched");

        let matched = router.route("git commit", &registry).unwrap();
        assert_eq!(matched.agent, "aider-agent");
        assert_eq!(matched.decision_type, DecisionType::Matched);
    }

    #[test]
    fn test_unregistered_fallback_fails() {
        let router = Router::new().with_fallback("ghost-agent");
        let result = router.route("Say hello", &registry());
        assert_eq!(result.unwrap_err(), ParliamentError::NotFound("ghost-agent".to_string()));
    }

    #[test]
    fn test_rank_orders_winner_first() {
        let ranked = Router::new().rank("Commit the latest changes", &registry());
        let agents: Vec<&str> = ranked.iter().map(|s| s.agent.as_str()).collect();
        // gemini and aider both score 1; gemini was registered first.
        assert_eq!(agents, vec!["gemini-agent", "aider-agent", "claude-agent"]);
        assert_eq!(ranked[2].score, 0);
        assert_eq!(ranked[2].reasoning(), "no strength tag matched");
    }

    #[test]
    fn test_unknown_strengths_never_score() {
        let card = CapabilityCard::new("odd-agent", "").with_strengths(["teleportation"]);
        let score = score_card(&card, &TokenSet::from_text("teleportation research"));
        assert_eq!(score.score, 0);
    }
}
