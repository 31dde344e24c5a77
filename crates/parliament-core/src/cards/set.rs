//! Card-set files: versionable static data that populates a registry.

use super::card::CapabilityCard;
use super::registry::Registry;
use crate::config::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

const BUILTIN_CARDS: &str = include_str!("../../cards/default_cards.toml");

/// An ordered list of capability cards loaded from TOML or JSON.
///
/// A name declared twice is allowed; the later card replaces the earlier one
/// when the set is registered.
///
/// # Example JSON
///
/// ```json
/// {"agents": [{"name": "aider-agent", "strengths": ["git-integration"]}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    /// Cards in declaration order.
    #[serde(default)]
    pub agents: Vec<CapabilityCard>,
}

impl CardSet {
    /// The built-in card set for the supported agents.
    ///
    /// # Errors
    /// Returns error if the embedded card data fails to parse.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CARDS)
    }

    /// Loads a card set, choosing the format by file extension.
    ///
    /// `.json` files are parsed as JSON; everything else as TOML.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let set =
            if is_json { Self::from_json_str(&content)? } else { Self::from_toml_str(&content)? };
        info!(path = %path.display(), cards = set.agents.len(), "Loaded agent cards");
        Ok(set)
    }

    /// Parses a TOML card set.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let set: Self = toml::from_str(content)?;
        set.validate()?;
        Ok(set)
    }

    /// Parses a JSON card set.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let set: Self = serde_json::from_str(content)?;
        set.validate()?;
        Ok(set)
    }

    /// Rejects empty names. Warns about names declared more than once.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for card in &self.agents {
            if card.name().trim().is_empty() {
                return Err(ConfigError::Invalid("agent card with empty name".to_string()));
            }
            if !seen.insert(card.name()) {
                warn!(agent = %card.name(), "Agent card declared more than once, later card wins");
            }
        }
        Ok(())
    }

    /// Registers every card into `registry`, replacing same-named entries.
    pub fn register_into(self, registry: &mut Registry) -> Result<()> {
        for card in self.agents {
            debug!(agent = %card.name(), "Registering card from card set");
            registry.register(card)?;
        }
        Ok(())
    }

    /// Builds a fresh registry from this card set.
    pub fn into_registry(self) -> Result<Registry> {
        let mut registry = Registry::new();
        self.register_into(&mut registry)?;
        Ok(registry)
    }
}
