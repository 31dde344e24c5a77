//! Capability registry for managing known agent cards.
//!
//! The registry is an explicit value passed to every routing operation. It keeps
//! cards in insertion order so enumeration and routing tie-breaks are
//! deterministic.

use super::card::CapabilityCard;
use crate::error::{ParliamentError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Registry shared between one writer and many readers.
///
/// Callers serialize `register` against concurrent routing through the lock.
pub type SharedRegistry = Arc<RwLock<Registry>>;

/// Summary of the registered agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeshStatus {
    /// Number of registered agents.
    pub active_agents: usize,
    /// Agent names in insertion order.
    pub agents: Vec<String>,
    /// Agents that can never win a routing decision.
    pub unroutable: Vec<String>,
}

/// Registry of capability cards keyed by agent name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Cards in insertion order.
    cards: Vec<CapabilityCard>,
    /// Map of agent name to position in `cards`.
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry by registering each card in order.
    pub fn from_cards<I>(cards: I) -> Result<Self>
    where
        I: IntoIterator<Item = CapabilityCard>,
    {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Wraps the registry for shared access.
    #[must_use]
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Inserts or replaces the card under `card.name()`.
    ///
    /// # Returns
    /// Returns `true` if the card was newly registered, `false` if it replaced
    /// an existing card. A replaced card keeps its original position.
    ///
    /// # Errors
    /// Returns `ParliamentError::Validation` if the card name is empty.
    pub fn register(&mut self, card: CapabilityCard) -> Result<bool> {
        let name = card.name().to_string();
        if name.trim().is_empty() {
            return Err(ParliamentError::Validation(
                "capability card name must not be empty".to_string(),
            ));
        }

        debug!(agent = %name, strengths = card.strengths().len(), "Registering agent card");

        if card.strengths().is_empty() {
            warn!(agent = %name, "Agent card has no strengths and can never be routed to");
        } else if !card.is_routable() {
            warn!(
                agent = %name,
                unknown = ?card.unknown_strengths(),
                "Agent card has no strengths known to the trigger table"
            );
        }

        if let Some(&position) = self.index.get(&name) {
            warn!(agent = %name, "Agent card replaced in registry");
            self.cards[position] = card;
            Ok(false)
        } else {
            self.index.insert(name, self.cards.len());
            self.cards.push(card);
            Ok(true)
        }
    }

    /// Retrieves a card by agent name.
    ///
    /// # Errors
    /// Returns `ParliamentError::NotFound` when no card has that name.
    pub fn get(&self, name: &str) -> Result<&CapabilityCard> {
        self.index
            .get(name)
            .map(|&position| &self.cards[position])
            .ok_or_else(|| ParliamentError::NotFound(name.to_string()))
    }

    /// Iterates all cards in insertion order. Each call starts a fresh pass.
    pub fn all(&self) -> impl Iterator<Item = &CapabilityCard> + '_ {
        self.cards.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Agent names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.cards.iter().map(CapabilityCard::name).collect()
    }

    /// Finds cards having a strength that contains `fragment` (case-insensitive).
    pub fn find_by_strength(&self, fragment: &str) -> Vec<&CapabilityCard> {
        let fragment = fragment.trim().to_lowercase();
        if fragment.is_empty() {
            return Vec::new();
        }
        self.cards
            .iter()
            .filter(|card| card.strengths().iter().any(|s| s.contains(&fragment)))
            .collect()
    }

    /// Cards that can never win a routing decision.
    pub fn unroutable(&self) -> Vec<&CapabilityCard> {
        self.cards.iter().filter(|card| !card.is_routable()).collect()
    }

    /// Returns a summary of the registered agents.
    pub fn status(&self) -> MeshStatus {
        MeshStatus {
            active_agents: self.cards.len(),
            agents: self.names().into_iter().map(str::to_string).collect(),
            unroutable: self.unroutable().into_iter().map(|c| c.name().to_string()).collect(),
        }
    }
}
