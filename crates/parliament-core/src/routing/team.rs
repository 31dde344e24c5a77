//! Team suggestion: split a composite task into canonical phases and pick an
//! agent for each.
//!
//! Phases are detected with [`PHASE_TRIGGERS`], the second fixed keyword table.
//! A phase is present when one of its markers appears in the task. Its keyword
//! window is the tokens of every clause that mentions a marker plus the phase's
//! fixed window keywords; agents are scored against that window with the
//! router's strength scoring.
//!
//! | Phase | Markers | Window |
//! |---|---|---|
//! | research | research, search, investigate, explore, find, lookup, gather, browse, study, survey, latest, current | research, search, web, latest, current, browse, investigate, gather |
//! | implement | implement, code, build, write, fix, refactor, develop, create, add, integrate, program | implement, code, design, architecture, algorithm, program |
//! | verify | test, tests, testing, verify, validate, check, review, qa, audit | test, verify, validate, sandbox, safe, isolated |
//! | deploy | deploy, deployment, release, ship, publish, rollout, launch | deploy, release, pipeline, workflow, automate, autonomous |
//!
//! Output always follows the canonical order research, implement, verify,
//! deploy, whatever order the task mentions them in.

use super::router::{self, AgentScore};
use super::triggers::{TokenSet, tokenize};
use crate::cards::Registry;
use crate::error::{ParliamentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Canonical stage of a decomposed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Gather information.
    Research,
    /// Make the changes.
    Implement,
    /// Check the changes.
    Verify,
    /// Ship the changes.
    Deploy,
}

impl Phase {
    /// All phases in canonical execution order.
    pub const CANONICAL: [Phase; 4] =
        [Phase::Research, Phase::Implement, Phase::Verify, Phase::Deploy];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Research => "research",
            Phase::Implement => "implement",
            Phase::Verify => "verify",
            Phase::Deploy => "deploy",
        }
    }

    /// Suggested sub-task title for the phase.
    pub fn subtask(self) -> &'static str {
        match self {
            Phase::Research => "Research and gather current information",
            Phase::Implement => "Implement code changes with reasoning",
            Phase::Verify => "Verify the changes in an isolated environment",
            Phase::Deploy => "Run the deployment workflow",
        }
    }

    /// Converts a label to a phase.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::CANONICAL.into_iter().find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }

    /// This phase's row of [`PHASE_TRIGGERS`].
    pub fn trigger(self) -> &'static PhaseTrigger {
        // PHASE_TRIGGERS is indexed in canonical order.
        &PHASE_TRIGGERS[self as usize]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the phase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTrigger {
    pub phase: Phase,
    /// Keywords whose presence means the phase is part of the task.
    pub markers: &'static [&'static str],
    /// Keywords always added to the phase's scoring window.
    pub window: &'static [&'static str],
}

/// The phase table, in canonical order. Keep the module docs in sync when editing.
pub const PHASE_TRIGGERS: &[PhaseTrigger] = &[
    PhaseTrigger {
        phase: Phase::Research,
        markers: &[
            "research",
            "search",
            "investigate",
            "explore",
            "find",
            "lookup",
            "gather",
            "browse",
            "study",
            "survey",
            "latest",
            "current",
        ],
        window: &["research", "search", "web", "latest", "current", "browse", "investigate", "gather"],
    },
    PhaseTrigger {
        phase: Phase::Implement,
        markers: &[
            "implement",
            "code",
            "build",
            "write",
            "fix",
            "refactor",
            "develop",
            "create",
            "add",
            "integrate",
            "program",
        ],
        window: &["implement", "code", "design", "architecture", "algorithm", "program"],
    },
    PhaseTrigger {
        phase: Phase::Verify,
        markers: &["test", "tests", "testing", "verify", "validate", "check", "review", "qa", "audit"],
        window: &["test", "verify", "validate", "sandbox", "safe", "isolated"],
    },
    PhaseTrigger {
        phase: Phase::Deploy,
        markers: &["deploy", "deployment", "release", "ship", "publish", "rollout", "launch"],
        window: &["deploy", "release", "pipeline", "workflow", "automate", "autonomous"],
    },
];

/// Words that separate clauses inside a sentence.
const CONNECTIVES: &[&str] = &["and", "then", "after", "finally", "next"];

/// Clause separators in the raw text.
const CLAUSE_SEPARATORS: &[char] = &[',', ';', '.', '!', '?', '\n'];

/// One suggested (agent, phase) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    /// Selected agent name.
    pub agent: String,
    pub phase: Phase,
    /// Suggested sub-task title.
    pub subtask: String,
    /// Winning score within the phase window.
    pub score: usize,
    /// Tags that decided the match.
    pub matched_tags: Vec<String>,
    /// Short justification, e.g. `matched tag: search-grounding`.
    pub reasoning: String,
}

/// Splits a composite task into canonical phases, each paired with its best agent.
///
/// # Errors
/// Returns `ParliamentError::NoDecomposition` if no phase marker appears, or
/// `ParliamentError::NoMatch` if a detected phase has no agent scoring above zero.
pub fn suggest_team(task: &str, registry: &Registry) -> Result<Vec<TeamMember>> {
    let clauses = split_clauses(task);
    let phases = detect_phases_in(&clauses);
    if phases.is_empty() {
        return Err(ParliamentError::NoDecomposition(task.to_string()));
    }

    phases
        .into_iter()
        .map(|phase| {
            let window = phase_window(phase, &clauses);
            let best = router::best_match(&window, registry).ok_or_else(|| {
                ParliamentError::NoMatch(format!("no agent matched phase '{phase}'"))
            })?;
            debug!(phase = %phase, agent = %best.agent, score = best.score, "Selected phase agent");
            Ok(member(phase, best))
        })
        .collect()
}

/// Phases mentioned in the task, in canonical order.
pub fn detect_phases(task: &str) -> Vec<Phase> {
    detect_phases_in(&split_clauses(task))
}

fn detect_phases_in(clauses: &[TokenSet]) -> Vec<Phase> {
    Phase::CANONICAL
        .into_iter()
        .filter(|phase| clauses.iter().any(|c| c.contains_any(phase.trigger().markers)))
        .collect()
}

/// Tokens of every clause mentioning the phase, plus the phase's window keywords.
fn phase_window(phase: Phase, clauses: &[TokenSet]) -> TokenSet {
    let trigger = phase.trigger();
    let mut window = TokenSet::from_keywords(trigger.window);
    for clause in clauses.iter().filter(|c| c.contains_any(trigger.markers)) {
        window.extend(clause);
    }
    window
}

/// Splits text on punctuation and connective words.
fn split_clauses(task: &str) -> Vec<TokenSet> {
    let mut clauses = Vec::new();
    for sentence in task.split(CLAUSE_SEPARATORS) {
        let mut current: Vec<String> = Vec::new();
        for token in tokenize(sentence) {
            if CONNECTIVES.contains(&token.as_str()) {
                push_clause(&mut clauses, &mut current);
            } else {
                current.push(token);
            }
        }
        push_clause(&mut clauses, &mut current);
    }
    clauses
}

fn push_clause(clauses: &mut Vec<TokenSet>, current: &mut Vec<String>) {
    if !current.is_empty() {
        let text = current.join(" ");
        clauses.push(TokenSet::from_text(&text));
        current.clear();
    }
}

fn member(phase: Phase, best: AgentScore) -> TeamMember {
    TeamMember {
        reasoning: best.reasoning(),
        agent: best.agent,
        phase,
        subtask: phase.subtask().to_string(),
        score: best.score,
        matched_tags: best.matched_tags,
    }
}
