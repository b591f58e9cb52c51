// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration model for the context processor.
//!
//! The processor is configured with an ordered list of actions, each one
//! mutating a key of the request metadata:
//!
//! ```yaml
//! actions:
//!   - action: insert
//!     key: tenant
//!     from_attribute: tenant.id   # resource attribute to read
//!     value: unknown              # used when the attribute is missing
//!   - action: upsert
//!     key: region
//!     value: us-east
//!   - action: delete
//!     key: x-debug
//! ```
//!
//! Validation rules:
//! - at least one action must be configured;
//! - every action needs a non-empty `key`;
//! - non-delete actions need `value` and/or `from_attribute`;
//! - delete actions accept neither.

pub mod action;
pub mod error;

pub use action::{ActionConfig, ActionKind};
pub use error::Error;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration of the context processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// List of actions to apply in order.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

impl Config {
    /// Creates a configuration from a list of action records.
    #[must_use]
    pub fn new(actions: Vec<ActionConfig>) -> Self {
        Self { actions }
    }

    /// Parses a configuration from a node user-config value.
    ///
    /// Only the shape is checked here, call [`Config::validate`] for the rules.
    pub fn from_json(config: &Value) -> Result<Self, Error> {
        serde_json::from_value(config.clone()).map_err(|e| Error::InvalidUserConfig {
            error: format!("Failed to parse context processor configuration: {e}"),
        })
    }

    /// Parses a configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml).map_err(|e| Error::InvalidUserConfig {
            error: format!("Failed to parse context processor configuration: {e}"),
        })
    }

    /// Checks the configuration rules, reporting the first violation.
    pub fn validate(&self) -> Result<(), Error> {
        if self.actions.is_empty() {
            return Err(Error::MissingActions);
        }

        for (index, action) in self.actions.iter().enumerate() {
            let Some(key) = action.key() else {
                return Err(Error::MissingKey { index });
            };
            if action.action == ActionKind::Delete {
                if action.has_source() {
                    return Err(Error::DeleteParamsNotAllowed {
                        index,
                        key: key.to_string(),
                    });
                }
            } else if !action.has_source() {
                return Err(Error::MissingSource {
                    index,
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
