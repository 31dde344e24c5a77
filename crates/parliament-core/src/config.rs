//! Configuration file support.
//!
//! A configuration decides which capability cards populate the registry and how
//! the router behaves when nothing matches. Files are TOML:
//!
//! ```toml
//! cards = "agents.toml"       # extra card set, relative to this file
//! include_builtin = true      # start from the built-in cards
//! log_level = "info"
//!
//! [routing]
//! fallback_agent = "claude-agent"
//!
//! [output]
//! format = "json"
//! ```

use crate::cards::{CardSet, Registry};
use crate::error::ParliamentError;
use crate::routing::Router;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading configuration, card sets or workflow files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File not found.
    #[error("configuration file not found: {0}")]
    NotFound(String),

    /// Invalid file contents.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Loaded data was rejected by the registry or workflow graph.
    #[error(transparent)]
    Card(#[from] ParliamentError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Routing preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Agent used when no strength tag matches. Unset means no fallback.
    #[serde(default)]
    pub fallback_agent: Option<String>,
}

/// Output format preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (human, json). Unset means human.
    #[serde(default)]
    pub format: Option<String>,
}

impl OutputConfig {
    /// The configured format, or `"human"` when unset.
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("human")
    }

    pub fn is_json(&self) -> bool {
        self.format().eq_ignore_ascii_case("json")
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParliamentConfig {
    /// Extra card set file layered over the built-in cards.
    #[serde(default)]
    pub cards: Option<PathBuf>,

    /// Whether to start from the built-in cards. Defaults to true.
    #[serde(default)]
    pub include_builtin: Option<bool>,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,
}

impl ParliamentConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `cards` path is resolved against the file's directory.
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable or malformed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        if let (Some(cards), Some(parent)) = (config.cards.as_ref(), path.parent()) {
            if cards.is_relative() {
                config.cards = Some(parent.join(cards));
            }
        }

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map_or_else(|_| PathBuf::from("."), PathBuf::from)
            .join(".parliament")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".parliamentrc")
    }

    /// Discovers and loads configuration files.
    ///
    /// Loads the global config (`~/.parliament/config.toml`) and then the local
    /// config (`./.parliamentrc`); local values override global ones. Missing
    /// files are skipped; malformed files are reported.
    ///
    /// # Errors
    /// Returns error if a discovered file cannot be parsed.
    pub fn discover_and_load() -> Result<Self> {
        Self::load_layered([Self::default_global_path(), Self::default_local_path()])
    }

    /// Loads each existing file in order, merging later files over earlier ones.
    ///
    /// # Errors
    /// Returns error if an existing file cannot be parsed.
    pub fn load_layered<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut config = Self::default();

        for path in paths {
            match Self::load_from_file(path.as_ref()) {
                Ok(found) => config.merge(&found),
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(config)
    }

    /// Merges another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are set.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref cards) = other.cards {
            self.cards = Some(cards.clone());
        }
        if let Some(include_builtin) = other.include_builtin {
            self.include_builtin = Some(include_builtin);
        }
        if let Some(ref fallback) = other.routing.fallback_agent {
            self.routing.fallback_agent = Some(fallback.clone());
        }
        if let Some(ref format) = other.output.format {
            self.output.format = Some(format.clone());
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
    }

    pub fn includes_builtin(&self) -> bool {
        self.include_builtin.unwrap_or(true)
    }

    /// Builds the registry: built-in cards (unless disabled) overlaid by the
    /// configured card set.
    ///
    /// # Errors
    /// Returns error if a card set fails to load or register.
    pub fn build_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        if self.includes_builtin() {
            CardSet::builtin()?.register_into(&mut registry)?;
        }
        if let Some(path) = &self.cards {
            CardSet::load(path)?.register_into(&mut registry)?;
        }
        debug!(agents = registry.len(), "Built registry from configuration");
        Ok(registry)
    }

    /// Router configured with the fallback agent, if any.
    pub fn router(&self) -> Router {
        match &self.routing.fallback_agent {
            Some(agent) => Router::new().with_fallback(agent.clone()),
            None => Router::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
cards = "agents.toml"
include_builtin = false
log_level = "debug"

[routing]
fallback_agent = "claude-agent"

[output]
format = "json"
"#,
        )
        .unwrap();

        let config = ParliamentConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.cards, Some(temp_dir.path().join("agents.toml")));
        assert!(!config.includes_builtin());
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert_eq!(config.routing.fallback_agent, Some("claude-agent".to_string()));
        assert_eq!(config.output.format(), "json");
        assert!(config.output.is_json());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ParliamentConfig::load_from_file(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "include_builtin = \"sometimes\"").unwrap();
        let result = ParliamentConfig::load_from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_defaults() {
        let config = ParliamentConfig::default();
        assert!(config.includes_builtin());
        assert_eq!(config.output.format(), "human");
        assert!(!config.output.is_json());
        assert!(config.router().fallback().is_none());
    }

    #[test]
    fn test_merge() {
        let mut base = ParliamentConfig {
            log_level: Some("info".to_string()),
            routing: RoutingConfig { fallback_agent: Some("claude-agent".to_string()) },
            ..Default::default()
        };
        let local = ParliamentConfig {
            include_builtin: Some(false),
            log_level: Some("trace".to_string()),
            ..Default::default()
        };

        base.merge(&local);
        assert!(!base.includes_builtin());
        assert_eq!(base.log_level, Some("trace".to_string()));
        assert_eq!(base.router().fallback(), Some("claude-agent"));
    }

    #[test]
    fn test_merge_lets_explicit_human_override_json() {
        let mut global = ParliamentConfig {
            output: OutputConfig { format: Some("json".to_string()) },
            ..Default::default()
        };
        global.merge(&ParliamentConfig::default());
        assert_eq!(global.output.format(), "json");

        let local = ParliamentConfig {
            output: OutputConfig { format: Some("human".to_string()) },
            ..Default::default()
        };
        global.merge(&local);
        assert_eq!(global.output.format(), "human");
    }

    #[test]
    fn test_load_layered_local_over_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("config.toml");
        let local = temp_dir.path().join(".parliamentrc");
        std::fs::write(
            &global,
            r#"
log_level = "info"

[routing]
fallback_agent = "claude-agent"

[output]
format = "json"
"#,
        )
        .unwrap();
        std::fs::write(&local, "[output]\nformat = \"human\"\n").unwrap();

        let config = ParliamentConfig::load_layered([&global, &local]).unwrap();
        assert_eq!(config.output.format(), "human");
        assert_eq!(config.log_level, Some("info".to_string()));
        assert_eq!(config.router().fallback(), Some("claude-agent"));

        let missing = temp_dir.path().join("missing.toml");
        let config = ParliamentConfig::load_layered([&global, &missing]).unwrap();
        assert_eq!(config.output.format(), "json");
    }

    #[test]
    fn test_build_registry_layers_card_file() {
        let temp_dir = TempDir::new().unwrap();
        let cards_path = temp_dir.path().join("agents.json");
        std::fs::write(
            &cards_path,
            r#"{"agents": [{"name": "local-agent", "strengths": ["coding"]}]}"#,
        )
        .unwrap();

        let config = ParliamentConfig { cards: Some(cards_path.clone()), ..Default::default() };
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 7);
        assert!(registry.contains("local-agent"));

        let only_local = ParliamentConfig {
            cards: Some(cards_path),
            include_builtin: Some(false),
            ..Default::default()
        };
        assert_eq!(only_local.build_registry().unwrap().names(), vec!["local-agent"]);
    }
}
