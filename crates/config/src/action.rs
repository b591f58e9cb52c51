// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Action records as they appear in the user configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of mutation an action performs on the request metadata.
///
/// Unrecognized names are kept as [`ActionKind::Unknown`] instead of failing
/// deserialization, so they are reported with their position when the
/// pipeline is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Write the value only if the key is not present yet.
    Insert,
    /// Append the value to an existing key.
    Update,
    /// Write the value, replacing any existing one.
    Upsert,
    /// Remove the key from the values written by previous actions.
    Delete,
    /// Any other action name.
    Unknown(String),
}

impl ActionKind {
    /// Returns the configuration name of this action kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Insert => "insert",
            ActionKind::Update => "update",
            ActionKind::Upsert => "upsert",
            ActionKind::Delete => "delete",
            ActionKind::Unknown(name) => name,
        }
    }
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "insert" => ActionKind::Insert,
            "update" => ActionKind::Update,
            "upsert" => ActionKind::Upsert,
            "delete" => ActionKind::Delete,
            _ => ActionKind::Unknown(value),
        }
    }
}

impl From<&str> for ActionKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ActionKind> for String {
    fn from(value: ActionKind) -> Self {
        match value {
            ActionKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `actions` list.
///
/// ```yaml
/// - action: upsert
///   key: tenant
///   from_attribute: tenant.id
///   value: unknown
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    /// What to do with the key.
    pub action: ActionKind,

    /// Target metadata key.
    #[serde(default)]
    pub key: Option<String>,

    /// Literal value, also the fallback when `from_attribute` is missing on the item.
    #[serde(default)]
    pub value: Option<String>,

    /// Name of the resource attribute to read the value from.
    #[serde(default)]
    pub from_attribute: Option<String>,
}

impl ActionConfig {
    /// Creates an action record with only a kind and a key.
    #[must_use]
    pub fn new(action: impl Into<ActionKind>, key: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            key: Some(key.into()),
            value: None,
            from_attribute: None,
        }
    }

    /// Sets the literal value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the source attribute.
    #[must_use]
    pub fn with_from_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.from_attribute = Some(attribute.into());
        self
    }

    /// Returns the target key, if one is set and non-empty.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// Returns true when the record names a value source.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.value.is_some() || self.from_attribute.is_some()
    }
}
