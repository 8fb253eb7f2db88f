use crate::cli::Cli;
use autolink_client::MediaWikiConfig;
use autolink_core::AutolinkConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of `autolink.toml`.
///
/// ```toml
/// [wiki]
/// api_url = "https://wiki.example.org/w/api.php"
/// namespace = 0
/// limit = "max"
///
/// [annotate]
/// max_pages = 100
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutolinkFileConfig {
    pub wiki: MediaWikiConfig,
    pub annotate: AnnotateSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateSection {
    /// Cap on inventory page requests per load.
    pub max_pages: usize,
}

impl Default for AnnotateSection {
    fn default() -> Self {
        Self {
            max_pages: autolink_core::config::DEFAULT_MAX_PAGES,
        }
    }
}

impl AutolinkFileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// File contents if it parses, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    /// Effective config: defaults, then the file (if present), then flags/env.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if cli.config.exists() {
            Self::load(&cli.config).map_err(|e| {
                anyhow::anyhow!("Failed to parse {}: {}", cli.config.display(), e)
            })?
        } else {
            Self::default()
        };
        config.apply_overrides(cli);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.wiki.api_url = url.clone();
        }
        if let Some(ns) = cli.namespace {
            self.wiki.namespace = ns;
        }
        if let Some(max) = cli.max_pages {
            self.annotate.max_pages = max;
        }
    }

    pub fn autolink_config(&self) -> AutolinkConfig {
        AutolinkConfig::new().with_max_pages(self.annotate.max_pages)
    }

    /// Every problem found, empty if the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.wiki.api_url.is_empty() {
            if let Err(e) = self.wiki.validate() {
                errors.push(format!("[wiki] {}", e));
            }
        }
        if let Err(e) = self.autolink_config().validate() {
            errors.push(format!("[annotate] {}", e));
        }
        errors
    }
}
