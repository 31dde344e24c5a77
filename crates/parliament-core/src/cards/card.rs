//! Capability card: static metadata describing one agent.

use crate::routing::triggers;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Capability card for one agent.
///
/// Cards are immutable once built. Replacing a card means registering a new
/// one under the same name.
///
/// # Example TOML
///
/// ```toml
/// [[agents]]
/// name = "gemini-agent"
/// description = "Web research and large-context analysis"
/// strengths = ["search-grounding", "multimodal"]
/// tools = ["gemini_prompt", "gemini_with_search"]
/// supported_features = { playbooks = true, search_grounding = true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CardRecord")]
pub struct CapabilityCard {
    name: String,
    description: String,
    strengths: BTreeSet<String>,
    tools: Vec<String>,
    version: String,
    publisher: String,
    context_window: String,
    /// Free-form feature flags advertised by the agent. Not used for routing.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    supported_features: BTreeMap<String, Value>,
}

impl CapabilityCard {
    /// Creates a card with no strengths or tools.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            strengths: BTreeSet::new(),
            tools: Vec::new(),
            version: default_version(),
            publisher: default_publisher(),
            context_window: default_context_window(),
            supported_features: BTreeMap::new(),
        }
    }

    /// Adds strength tags. Tags are trimmed and lower-cased; duplicates collapse.
    #[must_use]
    pub fn with_strengths<I, S>(mut self, strengths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.strengths.extend(normalize_strengths(strengths));
        self
    }

    /// Appends tool names, preserving order.
    #[must_use]
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.extend(tools.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    #[must_use]
    pub fn with_context_window(mut self, context_window: impl Into<String>) -> Self {
        self.context_window = context_window.into();
        self
    }

    /// Merges feature entries; later values win.
    #[must_use]
    pub fn with_supported_features<I, K>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.supported_features.extend(features.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Strength tags in sorted order.
    pub fn strengths(&self) -> &BTreeSet<String> {
        &self.strengths
    }

    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn context_window(&self) -> &str {
        &self.context_window
    }

    pub fn supported_features(&self) -> &BTreeMap<String, Value> {
        &self.supported_features
    }

    /// Whether the card has the exact (normalized) strength tag.
    pub fn has_strength(&self, tag: &str) -> bool {
        self.strengths.contains(&tag.trim().to_lowercase())
    }

    /// Strength tags with no entry in the trigger table.
    pub fn unknown_strengths(&self) -> Vec<&str> {
        self.strengths
            .iter()
            .filter(|s| !triggers::is_known_tag(s))
            .map(String::as_str)
            .collect()
    }

    /// Whether this card can ever win a routing decision.
    pub fn is_routable(&self) -> bool {
        self.strengths.iter().any(|s| triggers::is_known_tag(s))
    }
}

fn normalize_strengths<I, S>(strengths: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    strengths
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_publisher() -> String {
    "Unknown".to_string()
}

fn default_context_window() -> String {
    "unknown".to_string()
}

/// On-disk shape of a card, normalized into [`CapabilityCard`].
#[derive(Debug, Deserialize)]
struct CardRecord {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    tools: Vec<String>,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default = "default_publisher")]
    publisher: String,
    #[serde(default = "default_context_window")]
    context_window: String,
    #[serde(default)]
    supported_features: BTreeMap<String, Value>,
}

impl From<CardRecord> for CapabilityCard {
    fn from(record: CardRecord) -> Self {
        Self::new(record.name, record.description)
            .with_strengths(record.strengths)
            .with_tools(record.tools)
            .with_version(record.version)
            .with_publisher(record.publisher)
            .with_context_window(record.context_window)
            .with_supported_features(record.supported_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strengths_are_normalized_and_deduplicated() {
        let card = CapabilityCard::new("gemini-agent", "Google")
            .with_strengths(["Search-Grounding", " search-grounding ", "", "multimodal"]);

        let strengths: Vec<&str> = card.strengths().iter().map(String::as_str).collect();
        assert_eq!(strengths, vec!["multimodal", "search-grounding"]);
        assert!(card.has_strength("SEARCH-GROUNDING"));
    }

    #[test]
    fn test_tools_keep_order() {
        let card = CapabilityCard::new("aider-agent", "")
            .with_tools(["aider_chat", "aider_ask"])
            .with_tools(["aider_architect"]);
        assert_eq!(card.tools(), ["aider_chat", "aider_ask", "aider_architect"]);
    }

    #[test]
    fn test_routable_requires_known_strength() {
        let none = CapabilityCard::new("empty-agent", "");
        assert!(!none.is_routable());

        let unknown = CapabilityCard::new("odd-agent", "").with_strengths(["teleportation"]);
        assert!(!unknown.is_routable());
        assert_eq!(unknown.unknown_strengths(), vec!["teleportation"]);

        let known = CapabilityCard::new("aider-agent", "").with_strengths(["git-integration"]);
        assert!(known.is_routable());
        assert!(known.unknown_strengths().is_empty());
    }

    #[test]
    fn test_deserialize_applies_defaults_and_normalization() {
        let card: CapabilityCard = serde_json::from_str(
            r#"{"name": "codex-agent", "strengths": ["Sandboxed-Execution"]}"#,
        )
        .unwrap();

        assert_eq!(card.name(), "codex-agent");
        assert_eq!(card.description(), "");
        assert_eq!(card.version(), "1.0.0");
        assert_eq!(card.publisher(), "Unknown");
        assert_eq!(card.context_window(), "unknown");
        assert!(card.has_strength("sandboxed-execution"));
        assert!(card.supported_features().is_empty());
    }

    #[test]
    fn test_supported_features_round_trip_through_json() {
        let card = CapabilityCard::new("codex-agent", "")
            .with_supported_features([("sandboxed_execution", Value::Bool(true))])
            .with_supported_features([(
                "approval_modes",
                serde_json::json!(["suggest", "auto-edit", "full-auto"]),
            )]);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["supported_features"]["sandboxed_execution"], true);
        assert_eq!(json["supported_features"]["approval_modes"][2], "full-auto");

        let restored: CapabilityCard = serde_json::from_value(json).unwrap();
        assert_eq!(restored, card);
    }

    #[test]
    fn test_empty_supported_features_are_not_serialized() {
        let json = serde_json::to_value(CapabilityCard::new("empty-agent", "")).unwrap();
        assert!(json.get("supported_features").is_none());
    }
}
