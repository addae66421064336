//! # Configuration
//!
//! Outline configuration is managed by [`confique`], which handles layered loading from a
//! TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `ARTICLETREE_ID_STRATEGY`, `ARTICLETREE_DEFAULT_TITLE`,
//!    `ARTICLETREE_HISTORY_LIMIT`.
//! 2. **Config file**: the TOML file handed to [`OutlineConfig::load`]. A missing file is
//!    not an error.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `id_strategy` | `uuid` | `uuid` or `sequential` identity generation |
//! | `default_title` | `New Article` | Base for synthetic titles (`New Article 1`, ...) |
//! | `history_limit` | `100` | Number of undoable transactions kept |

use crate::error::{Result, TreeError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    Uuid,
    Sequential,
}

#[derive(Debug, Error)]
#[error("unknown id strategy '{0}' (expected 'uuid' or 'sequential')")]
pub struct ParseIdStrategyError(String);

impl FromStr for IdStrategy {
    type Err = ParseIdStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" => Ok(IdStrategy::Sequential),
            other => Err(ParseIdStrategyError(other.to_string())),
        }
    }
}

/// Configuration for an outline document store.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutlineConfig {
    /// How fresh article identities are generated ("uuid" or "sequential").
    #[config(
        default = "uuid",
        env = "ARTICLETREE_ID_STRATEGY",
        parse_env = IdStrategy::from_str
    )]
    pub id_strategy: IdStrategy,

    /// Base title for articles created without one.
    #[config(default = "New Article", env = "ARTICLETREE_DEFAULT_TITLE")]
    pub default_title: String,

    /// Maximum number of undoable transactions.
    #[config(default = 100, env = "ARTICLETREE_HISTORY_LIMIT")]
    pub history_limit: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Uuid,
            default_title: "New Article".to_string(),
            history_limit: 100,
        }
    }
}

impl OutlineConfig {
    /// Loads the layered configuration, reading `path` if it exists.
    pub fn load(path: &Path) -> Result<Self> {
        OutlineConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| TreeError::Config(e.to_string()))
    }

    /// Base title, falling back to the default when configured blank.
    pub fn default_title(&self) -> &str {
        let trimmed = self.default_title.trim();
        if trimmed.is_empty() {
            "New Article"
        } else {
            trimmed
        }
    }
}
