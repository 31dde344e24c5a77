//! Keyword routing for agent selection.
//!
//! This module maps free-text task descriptions onto registered agents using two
//! fixed, auditable keyword tables: strength triggers for single-agent routing
//! and phase markers for multi-agent team suggestions.

pub mod router;
pub mod team;
pub mod triggers;

pub use router::{AgentScore, DecisionType, Router, RoutingDecision, route};
pub use team::{PHASE_TRIGGERS, Phase, PhaseTrigger, TeamMember, detect_phases, suggest_team};
pub use triggers::{STRENGTH_TRIGGERS, StrengthTrigger, TokenSet};
