use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::defaults::{default_rules, default_token_table};
use crate::error::ConfigError;
use crate::token::{TokenInfo, TokenRegistry, TokenTable};
use crate::types::rule::ConversionRule;

/// Settings document holding the conversion rules and the token table.
///
/// Missing sections fall back to the built-in defaults. A `tokens` section
/// replaces the built-in table entirely rather than extending it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Ordered conversion rules.
    #[serde(default = "default_rules")]
    pub rules: Vec<ConversionRule>,

    /// Token table keyed by contract address, in file order. Addresses that
    /// collide after lowercasing resolve to the last entry.
    #[serde(default = "default_tokens")]
    pub tokens: IndexMap<String, TokenInfo>,
}

fn default_tokens() -> IndexMap<String, TokenInfo> {
    let mut tokens: IndexMap<_, _> = default_token_table()
        .iter()
        .map(|(address, info)| (address.clone(), info.clone()))
        .collect();
    tokens.sort_keys();
    tokens
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            tokens: default_tokens(),
        }
    }
}

impl AppConfig {
    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Serialize settings to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            rules = config.rules.len(),
            tokens = config.tokens.len(),
            "settings loaded"
        );
        Ok(config)
    }

    /// Write settings to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Token table built from the `tokens` section.
    pub fn token_table(&self) -> TokenTable {
        TokenTable::from_entries(
            self.tokens
                .iter()
                .map(|(address, info)| (address, info.clone())),
        )
    }

    /// Registry seeded with the `tokens` section.
    pub fn registry(&self) -> TokenRegistry {
        TokenRegistry::new(self.token_table())
    }

    /// Normalize addresses, tidy rules, and reject unusable token entries.
    fn validated(mut self) -> Result<Self, ConfigError> {
        let mut tokens = IndexMap::with_capacity(self.tokens.len());
        for (address, info) in std::mem::take(&mut self.tokens) {
            let normalized = address.trim().to_lowercase();
            if normalized.is_empty() {
                return Err(ConfigError::InvalidToken {
                    address,
                    reason: "address is empty".to_string(),
                });
            }
            tokens.insert(normalized, info);
        }
        self.tokens = tokens;

        self.rules.retain(|rule| {
            let keep = !rule.token_key.trim().is_empty();
            if !keep {
                warn!(amount_keys = ?rule.amount_keys, "dropping rule with empty token key");
            }
            keep
        });
        for rule in &mut self.rules {
            rule.dedup_amount_keys();
        }

        Ok(self)
    }
}
