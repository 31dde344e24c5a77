//! CLI configuration loading and merging.

use anyhow::Context as _;
use parliament_core::{ParliamentConfig, Registry, Router};
use std::path::PathBuf;
use tracing::debug;

/// Global flags that override configuration files.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub cards: Option<PathBuf>,
    pub no_builtin: bool,
    pub fallback: Option<String>,
}

/// Load and merge CLI configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (handled by clap)
/// 2. `--config` file, or else local config file (./.parliamentrc)
///    over global config file (~/.parliament/config.toml)
/// 3. Defaults
pub fn load_config(overrides: &Overrides) -> anyhow::Result<ParliamentConfig> {
    let mut config = match &overrides.config {
        Some(path) => ParliamentConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ParliamentConfig::discover_and_load().context("failed to load configuration")?,
    };

    if let Some(cards) = &overrides.cards {
        config.cards = Some(cards.clone());
    }
    if overrides.no_builtin {
        config.include_builtin = Some(false);
    }
    if let Some(fallback) = &overrides.fallback {
        config.routing.fallback_agent = Some(fallback.clone());
    }

    Ok(config)
}

/// Registry, router and output preferences shared by every command.
pub struct Context {
    pub registry: Registry,
    pub router: Router,
    json_default: bool,
}

impl Context {
    pub fn from_config(config: &ParliamentConfig) -> anyhow::Result<Self> {
        let registry = config.build_registry().context("failed to build agent registry")?;
        debug!(agents = registry.len(), "Registry ready");
        Ok(Self {
            registry,
            router: config.router(),
            json_default: config.output.is_json(),
        })
    }

    /// Whether to print JSON, given the command's `--json` flag.
    pub fn json(&self, flag: bool) -> bool {
        flag || self.json_default
    }
}
