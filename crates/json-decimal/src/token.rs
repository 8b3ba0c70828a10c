use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::defaults::default_token_table;

/// Precision assumed for addresses missing from the table.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub decimals: u8,

    /// Display suffix; empty means amounts are rendered without one.
    #[serde(default)]
    pub symbol: String,
}

impl TokenInfo {
    pub fn new(decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            decimals,
            symbol: symbol.into(),
        }
    }
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMALS, "")
    }
}

/// Normalized registry key for a contract address.
fn normalize(address: &str) -> String {
    address.to_lowercase()
}

/// Trait for token metadata providers.
///
/// Lookups never fail: unknown addresses resolve to [`TokenInfo::default`].
pub trait TokenSource {
    fn token_info(&self, address: &str) -> TokenInfo;
}

/// Immutable address → metadata table with lowercase keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTable {
    entries: HashMap<String, TokenInfo>,
}

impl TokenTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, lowercasing every address. Later entries win when two
    /// addresses collide after normalization.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, TokenInfo)>,
        K: AsRef<str>,
    {
        let mut builder = TokenTableBuilder::new();
        for (address, info) in entries {
            builder.insert(address.as_ref(), info);
        }
        builder.build()
    }

    /// Look up an address, falling back to 18 decimals and no symbol.
    pub fn get(&self, address: &str) -> TokenInfo {
        self.lookup(address).cloned().unwrap_or_default()
    }

    /// Look up an address without applying the default.
    pub fn lookup(&self, address: &str) -> Option<&TokenInfo> {
        self.entries.get(&normalize(address))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenInfo)> {
        self.entries.iter()
    }

    /// Copy the entries out, e.g. for an editing collaborator.
    pub fn to_map(&self) -> HashMap<String, TokenInfo> {
        self.entries.clone()
    }

    /// Start a builder seeded with this table's entries.
    pub fn to_builder(&self) -> TokenTableBuilder {
        TokenTableBuilder {
            entries: self.entries.clone(),
        }
    }
}

impl TokenSource for TokenTable {
    fn token_info(&self, address: &str) -> TokenInfo {
        self.get(address)
    }
}

/// Accumulates edits for a new [`TokenTable`].
#[derive(Debug, Clone, Default)]
pub struct TokenTableBuilder {
    entries: HashMap<String, TokenInfo>,
}

impl TokenTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override an entry.
    pub fn insert(&mut self, address: &str, info: TokenInfo) -> &mut Self {
        self.entries.insert(normalize(address), info);
        self
    }

    /// Remove an entry, returning its previous metadata.
    pub fn remove(&mut self, address: &str) -> Option<TokenInfo> {
        self.entries.remove(&normalize(address))
    }

    pub fn build(self) -> TokenTable {
        TokenTable {
            entries: self.entries,
        }
    }
}

/// Shared, swappable token table.
///
/// Readers pin the current table with [`TokenRegistry::current`]; writers
/// replace it whole, so a reader sees either the old or the new mapping.
#[derive(Debug)]
pub struct TokenRegistry {
    current: RwLock<Arc<TokenTable>>,
}

impl TokenRegistry {
    pub fn new(table: TokenTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Registry seeded with the built-in table.
    pub fn with_defaults() -> Self {
        Self::new(default_token_table())
    }

    /// The table active at the time of the call.
    pub fn current(&self) -> Arc<TokenTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, address: &str) -> TokenInfo {
        self.current().get(address)
    }

    /// Replace the whole mapping. Addresses are lowercased; entries are
    /// never merged with the previous table.
    pub fn replace_all<I, K>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, TokenInfo)>,
        K: AsRef<str>,
    {
        self.replace_table(TokenTable::from_entries(entries));
    }

    pub fn replace_table(&self, table: TokenTable) {
        let count = table.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
        info!(tokens = count, "token registry replaced");
    }

    /// Apply edits to a copy of the current table and swap it in.
    ///
    /// `edit` runs without any lock held, so it may read from this registry.
    /// A replacement that lands while `edit` runs is overwritten by the swap.
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut TokenTableBuilder),
    {
        let mut builder = self.current().to_builder();
        edit(&mut builder);
        let table = builder.build();
        let count = table.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
        info!(tokens = count, "token registry updated");
    }

    /// Detached copy of the active mapping.
    pub fn snapshot(&self) -> HashMap<String, TokenInfo> {
        self.current().to_map()
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TokenSource for TokenRegistry {
    fn token_info(&self, address: &str) -> TokenInfo {
        self.get(address)
    }
}
