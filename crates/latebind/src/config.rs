// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! latebind configuration - single source of truth for defaults.
//!
//! - **Static**: compile-time defaults below
//! - **Runtime**: [`RuntimeConfig`], optionally loaded from YAML
//!   (`config-loaders` feature)
//!
//! # Example YAML
//!
//! ```yaml
//! pool_capacity: 32
//! jsonp_token: "callback="
//! default_status: 200
//! ```

use std::fmt;

/// Idle requests kept by a factory pool.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Url marker selecting JSONP responses.
pub const DEFAULT_JSONP_TOKEN: &str = "callback=";

/// Status reported while no explicit status has been set.
pub const DEFAULT_STATUS: i64 = 200;

/// Separator of `k=v` lines in text responses and header listings.
pub const LINE_SEPARATOR: &str = "\n";

/// Valid HTTP status range.
pub const STATUS_RANGE: std::ops::RangeInclusive<i64> = 100..=599;

/// Runtime configuration of request factories.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct RuntimeConfig {
    /// Idle requests kept for reuse (0 disables pooling)
    pub pool_capacity: usize,
    /// Url marker selecting JSONP responses (empty disables JSONP)
    pub jsonp_token: String,
    /// Status substituted for an unset (zero) status
    pub default_status: i64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            jsonp_token: DEFAULT_JSONP_TOKEN.to_string(),
            default_status: DEFAULT_STATUS,
        }
    }
}

impl RuntimeConfig {
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub fn with_jsonp_token(mut self, token: impl Into<String>) -> Self {
        self.jsonp_token = token.into();
        self
    }

    pub fn with_default_status(mut self, status: i64) -> Self {
        self.default_status = status;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !STATUS_RANGE.contains(&self.default_status) {
            return Err(ConfigError::Invalid(format!(
                "default_status {} outside {}..={}",
                self.default_status,
                STATUS_RANGE.start(),
                STATUS_RANGE.end()
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "config-loaders")]
impl RuntimeConfig {
    /// Load and validate a YAML configuration file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::Io(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::parse_yaml(&content)
    }

    /// Parse and validate YAML text. Missing keys take their defaults.
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document is the default configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("failed to parse YAML: {}", e)))?;
        config.validate()?;
        log::debug!("runtime config loaded: {:?}", config);
        Ok(config)
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config I/O error: {}", msg),
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
