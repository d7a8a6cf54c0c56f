//! Per-call-site engine settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver::BlockSorter;
use crate::error::{ConfigError, MergeError};
use crate::merge::{MergeArity, Merger};
use crate::order::SortOrder;

/// Base block length produced by the block presort.
pub const DEFAULT_BASE_BLOCK: usize = 32;

/// Ordering, base block length and fan-in, fixed for a call site.
///
/// Loaded from TOML, every field optional:
///
/// ```toml
/// order = "descending"
/// base_block = 32
/// max_arity = 4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub order: SortOrder,
    pub base_block: usize,
    pub max_arity: MergeArity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order: SortOrder::Descending,
            base_block: DEFAULT_BASE_BLOCK,
            max_arity: MergeArity::Four,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.base_block == 0 {
            return Err(MergeError::ZeroBlockLen);
        }
        Ok(())
    }

    pub fn merger(&self) -> Merger<SortOrder> {
        Merger::new(self.order).with_max_arity(self.max_arity)
    }

    pub fn sorter(&self) -> BlockSorter<SortOrder> {
        BlockSorter::new(self.merger())
    }
}
