use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DictError, DictResult};
use crate::known::DEFAULT_NAMESPACES;
use crate::transient::DEFAULT_LITERAL_THRESHOLD;

/// Configuration for a standard dictionary chain.
///
/// Every field has a default, so a TOML file only needs to name what it
/// overrides:
///
/// ```toml
/// name = "terms"
///
/// [transient]
/// literal_threshold = 256
///
/// [outer_cache]
/// id_cache_size = 50000
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Base name of the chain; backing indexes are derived from it.
    pub name: String,
    /// Node identifier seeding fresh sequence ids.
    pub node_id: u16,
    pub transient: TransientConfig,
    /// First-level cache at the top of the chain.
    pub outer_cache: CacheConfig,
    /// Cumulative cache in front of the persistent dictionary.
    pub inner_cache: CacheConfig,
    /// Caches in front of the namespace and local-name dictionaries.
    pub string_cache: CacheConfig,
    pub known_terms: KnownTermsConfig,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            name: "terms".into(),
            node_id: 0,
            transient: TransientConfig::default(),
            outer_cache: CacheConfig::default(),
            inner_cache: CacheConfig::default(),
            string_cache: CacheConfig::default(),
            known_terms: KnownTermsConfig::default(),
        }
    }
}

/// Sizes of the two LRU caches of one cache decorator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries in the value → identifier cache.
    pub id_cache_size: usize,
    /// Entries in the identifier → value cache.
    pub value_cache_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            id_cache_size: 1000,
            value_cache_size: 1000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransientConfig {
    /// Literal label length (in characters) above which literals are
    /// delegated. `0` never delegates; negative selects the default.
    pub literal_threshold: i64,
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            literal_threshold: DEFAULT_LITERAL_THRESHOLD as i64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnownTermsConfig {
    pub enabled: bool,
    /// Namespace IRIs whose resources get known-term identifiers.
    pub namespaces: Vec<String>,
}

impl Default for KnownTermsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
        }
    }
}

impl DictionaryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> DictResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| DictError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> DictResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DictError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| DictError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DictResult<()> {
        if self.name.is_empty() {
            return Err(DictError::InvalidConfig("name must not be empty".into()));
        }
        for (section, cache) in [
            ("outer_cache", &self.outer_cache),
            ("inner_cache", &self.inner_cache),
            ("string_cache", &self.string_cache),
        ] {
            cache.validate(section)?;
        }
        if let Some(pos) = self.known_terms.namespaces.iter().position(String::is_empty) {
            return Err(DictError::InvalidConfig(format!(
                "known_terms.namespaces[{pos}] is empty"
            )));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub(crate) fn validate(&self, section: &str) -> DictResult<()> {
        if self.id_cache_size == 0 {
            return Err(DictError::InvalidConfig(format!(
                "{section}.id_cache_size must be positive"
            )));
        }
        if self.value_cache_size == 0 {
            return Err(DictError::InvalidConfig(format!(
                "{section}.value_cache_size must be positive"
            )));
        }
        Ok(())
    }
}
