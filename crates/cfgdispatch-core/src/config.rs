//! Dispatch configuration
//!
//! Loaded from TOML at startup, e.g.:
//!
//! ```toml
//! passes = "single"
//! log_profile = "production"
//!
//! [[callbacks]]
//! path = "/interfaces/interface"
//!
//! [[callbacks]]
//! path = "/system/hostname"
//! ```
//!
//! `callbacks` lists registration paths in priority order. It is consumed by
//! front ends that bind paths to handlers (the CLI does); the core table
//! itself is always built in code.

use crate::errors::{DispatchError, Result};
use crate::logging_facility::Profile;
use serde::Deserialize;
use std::path::Path;

/// How many times the root is walked per change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassPolicy {
    /// One walk from the root. At most one top-level entry is dispatched.
    #[default]
    Single,
    /// Walk the root again while a top-level entry is still pending.
    ///
    /// Children of an already-applied node are never revisited, so nodes
    /// below the top level can still be left pending.
    UntilSettled,
}

impl std::str::FromStr for PassPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "single" => Ok(PassPolicy::Single),
            "until-settled" => Ok(PassPolicy::UntilSettled),
            other => Err(format!("unknown pass policy: {}", other)),
        }
    }
}

/// One callback registration declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallbackSpec {
    /// Configuration path the callback handles
    pub path: String,
}

/// Top-level dispatch configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Pass policy for each change event
    pub passes: PassPolicy,
    /// Logging profile for front ends that initialise logging
    pub log_profile: Profile,
    /// Callback registrations in priority order
    pub callbacks: Vec<CallbackSpec>,
}

impl DispatchConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// - `Serialization` if the text is not valid TOML for this schema
    /// - `InvalidTree` if a callback path is empty
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DispatchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// See [`DispatchConfig::from_toml_str`]; unreadable files are reported
    /// as `Serialization`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DispatchError::Serialization {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if let Some(index) = self.callbacks.iter().position(|c| c.path.trim().is_empty()) {
            return Err(DispatchError::InvalidTree {
                reason: format!("callback #{} has an empty path", index + 1),
            });
        }
        Ok(())
    }
}
