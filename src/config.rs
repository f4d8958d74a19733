//! Matcher configuration.
//!
//! Load from TOML to override the group size or mat count without code
//! changes. Tolerance tiers are fixed constants in [`crate::compat`] and
//! are not configurable.
//!
//! ```
//! use mat_brackets::config::MatcherConfig;
//!
//! let config = MatcherConfig::from_toml_str("mat_count = 5").unwrap();
//! assert_eq!(config.group_size, 4);
//! assert_eq!(config.mat_count, 5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BracketError;

/// Smallest group the matcher will form.
pub const MIN_GROUP_SIZE: usize = 3;

/// Matcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct MatcherConfig {
    /// Target participants per group.
    #[serde(default = "default_group_size")]
    pub group_size: usize,

    /// Number of mats groups are spread across.
    #[serde(default = "default_mat_count")]
    pub mat_count: u32,
}

fn default_group_size() -> usize {
    4
}

fn default_mat_count() -> u32 {
    3
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            mat_count: default_mat_count(),
        }
    }
}

impl MatcherConfig {
    /// Creates the default configuration (groups of 4 on 3 mats).
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BracketError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BracketError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the target group size.
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }

    /// Sets the mat count.
    pub fn with_mat_count(mut self, mat_count: u32) -> Self {
        self.mat_count = mat_count;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), BracketError> {
        if self.group_size < MIN_GROUP_SIZE {
            return Err(BracketError::InvalidConfig(format!(
                "group_size must be at least {MIN_GROUP_SIZE}, got {}",
                self.group_size
            )));
        }
        if self.mat_count == 0 {
            return Err(BracketError::InvalidConfig(
                "mat_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
