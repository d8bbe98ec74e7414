//! Executor configuration loading

use crate::core::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What to do when two partial resolver maps define the same coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Fail the registry build with a `DuplicateResolverError`
    #[default]
    FailFast,

    /// Keep the resolver from the map that comes last
    LastWins,
}

/// Configuration for the registry build and the executor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Conflict handling when merging resolver maps
    pub merge_policy: MergePolicy,

    /// Maximum number of sibling fields or list items polled at once.
    /// `None` fans out without bound.
    pub max_concurrency: Option<usize>,
}

impl ExecutorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrency".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }
}
