// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Metadata actions and the per-call overlay they write to.

use crate::attributes::Attributes;
use crate::metadata::Metadata;
use context_processor_config::{ActionConfig, ActionKind, Error as ConfigError};
use std::collections::{BTreeMap, BTreeSet};

/// Writes made by the actions of a single pipeline run.
///
/// The overlay shadows the base metadata: a key's effective value is the
/// overlay value if there is one, else the base value. Removing a key from the
/// overlay therefore re-exposes the base value, if any.
#[derive(Debug, Default)]
pub struct Overlay {
    entries: BTreeMap<String, Vec<String>>,
}

impl Overlay {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the effective value of `key` over `base`.
    #[must_use]
    pub fn effective<'a>(&'a self, base: &'a Metadata, key: &str) -> Option<&'a [String]> {
        match self.entries.get(key) {
            Some(values) => Some(values.as_slice()),
            None => base.get(key),
        }
    }

    /// Returns the value written to the overlay for `key`, ignoring the base.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    fn set(&mut self, key: &str, values: Vec<String>) {
        let _ = self.entries.insert(key.to_string(), values);
    }

    fn remove(&mut self, key: &str) {
        let _ = self.entries.remove(key);
    }

    /// Folds the overlay over `base`: overlay keys take their overlay value,
    /// keys only present in `base` are carried through unchanged.
    ///
    /// A base key is shadowed by any overlay key whose lookup reads from it,
    /// including lookups matched ignoring case.
    #[must_use]
    pub fn merge_into(self, base: &Metadata) -> Metadata {
        let shadowed: BTreeSet<&str> = self
            .entries
            .keys()
            .filter_map(|key| base.resolve_key(key))
            .collect();
        let mut merged = self.entries;
        for (key, values) in base.entries() {
            if !shadowed.contains(key.as_str()) {
                let _ = merged.insert(key.clone(), values.clone());
            }
        }
        Metadata::from(merged)
    }
}

/// Target and value source shared by the writing actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTarget {
    key: String,
    value: String,
    from_attribute: Option<String>,
}

impl ActionTarget {
    /// Creates a target. An empty `from_attribute` is treated as unset.
    pub fn new(
        key: impl Into<String>,
        value: Option<String>,
        from_attribute: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.unwrap_or_default(),
            from_attribute: from_attribute.filter(|a| !a.is_empty()),
        }
    }

    /// Target metadata key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolves the value to write for the current item.
    ///
    /// The source attribute wins when present on the item, otherwise the
    /// literal value is used (empty when none was configured).
    #[must_use]
    pub fn resolve(&self, attributes: &Attributes) -> String {
        self.from_attribute
            .as_deref()
            .and_then(|name| attributes.get(name))
            .map_or_else(|| self.value.clone(), |v| v.as_string())
    }
}

/// A mutation of the request metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write the value if the key is absent. A present key is re-written with
    /// its current value, which pins it into the overlay.
    Insert(ActionTarget),
    /// Write the value, replacing any current one.
    Upsert(ActionTarget),
    /// Append the value to a present key. Absent keys are left absent.
    Update(ActionTarget),
    /// Remove the key from the overlay. A base value becomes visible again.
    Delete {
        /// Target metadata key.
        key: String,
    },
}

impl Action {
    /// Builds the action described by the `index`-th configuration record.
    ///
    /// The record is expected to have passed validation.
    pub fn from_config(index: usize, config: &ActionConfig) -> Result<Self, ConfigError> {
        let key = config
            .key()
            .ok_or(ConfigError::MissingKey { index })?
            .to_string();
        let target =
            |key: String| ActionTarget::new(key, config.value.clone(), config.from_attribute.clone());

        match &config.action {
            ActionKind::Insert => Ok(Action::Insert(target(key))),
            ActionKind::Upsert => Ok(Action::Upsert(target(key))),
            ActionKind::Update => Ok(Action::Update(target(key))),
            ActionKind::Delete => Ok(Action::Delete { key }),
            ActionKind::Unknown(action) => Err(ConfigError::UnknownActionKind {
                index,
                action: action.clone(),
            }),
        }
    }

    /// Target metadata key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Action::Insert(t) | Action::Upsert(t) | Action::Update(t) => t.key(),
            Action::Delete { key } => key,
        }
    }

    /// Kind of this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Insert(_) => ActionKind::Insert,
            Action::Upsert(_) => ActionKind::Upsert,
            Action::Update(_) => ActionKind::Update,
            Action::Delete { .. } => ActionKind::Delete,
        }
    }

    /// Runs the action. Its only effect is on `overlay`.
    pub fn execute(&self, overlay: &mut Overlay, base: &Metadata, attributes: &Attributes) {
        match self {
            Action::Insert(target) => {
                let values = match overlay.effective(base, target.key()) {
                    Some(current) => current.to_vec(),
                    None => vec![target.resolve(attributes)],
                };
                overlay.set(target.key(), values);
            }
            Action::Upsert(target) => {
                overlay.set(target.key(), vec![target.resolve(attributes)]);
            }
            Action::Update(target) => {
                if let Some(current) = overlay.effective(base, target.key()) {
                    let mut values = current.to_vec();
                    values.push(target.resolve(attributes));
                    overlay.set(target.key(), values);
                }
            }
            Action::Delete { key } => overlay.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AnyValue, KeyValue};

    fn target(key: &str, value: Option<&str>, from: Option<&str>) -> ActionTarget {
        ActionTarget::new(key, value.map(String::from), from.map(String::from))
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn resolve_prefers_attribute_then_literal_then_empty() {
        let attrs = Attributes::new(vec![KeyValue::new("region", "us-east")]);

        assert_eq!(
            target("k", Some("fallback"), Some("region")).resolve(&attrs),
            "us-east"
        );
        assert_eq!(
            target("k", Some("fallback"), Some("nope")).resolve(&attrs),
            "fallback"
        );
        assert_eq!(target("k", None, Some("nope")).resolve(&attrs), "");
        assert_eq!(target("k", Some("lit"), None).resolve(&attrs), "lit");
        // An empty attribute name means no attribute lookup.
        assert_eq!(target("k", Some("lit"), Some("")).resolve(&attrs), "lit");
    }

    #[test]
    fn resolve_renders_non_string_attributes() {
        let attrs = Attributes::new(vec![
            KeyValue::new("port", AnyValue::Int(4317)),
            KeyValue::new("ratio", AnyValue::Double(0.25)),
        ]);
        assert_eq!(target("k", None, Some("port")).resolve(&attrs), "4317");
        assert_eq!(target("k", None, Some("ratio")).resolve(&attrs), "0.25");
    }

    #[test]
    fn insert_writes_absent_key() {
        let base = Metadata::new();
        let mut overlay = Overlay::new();
        Action::Insert(target("k", Some("v"), None)).execute(
            &mut overlay,
            &base,
            &Attributes::default(),
        );
        assert_eq!(overlay.get("k"), Some(&strings(&["v"])[..]));
    }

    #[test]
    fn insert_pins_present_base_value_into_overlay() {
        let base: Metadata = [("k", vec!["b1", "b2"])].into_iter().collect();
        let mut overlay = Overlay::new();
        Action::Insert(target("k", Some("v"), None)).execute(
            &mut overlay,
            &base,
            &Attributes::default(),
        );
        assert_eq!(overlay.get("k"), Some(&strings(&["b1", "b2"])[..]));
    }

    #[test]
    fn upsert_replaces() {
        let base: Metadata = [("k", vec!["old"])].into_iter().collect();
        let mut overlay = Overlay::new();
        Action::Upsert(target("k", Some("new"), None)).execute(
            &mut overlay,
            &base,
            &Attributes::default(),
        );
        assert_eq!(overlay.effective(&base, "k"), Some(&strings(&["new"])[..]));
    }

    #[test]
    fn update_appends_or_skips() {
        let base: Metadata = [("k", vec!["v0"])].into_iter().collect();
        let mut overlay = Overlay::new();
        let attrs = Attributes::default();

        Action::Update(target("k", Some("v1"), None)).execute(&mut overlay, &base, &attrs);
        Action::Update(target("missing", Some("x"), None)).execute(&mut overlay, &base, &attrs);

        assert_eq!(overlay.get("k"), Some(&strings(&["v0", "v1"])[..]));
        assert!(overlay.effective(&base, "missing").is_none());
        // The base is never touched.
        assert_eq!(base.get("k"), Some(&strings(&["v0"])[..]));
    }

    #[test]
    fn delete_only_affects_overlay() {
        let base: Metadata = [("k", vec!["base"])].into_iter().collect();
        let mut overlay = Overlay::new();
        let attrs = Attributes::default();

        Action::Upsert(target("k", Some("over"), None)).execute(&mut overlay, &base, &attrs);
        Action::Upsert(target("only", Some("over"), None)).execute(&mut overlay, &base, &attrs);
        for key in ["k", "only"] {
            Action::Delete { key: key.into() }.execute(&mut overlay, &base, &attrs);
        }

        assert_eq!(overlay.effective(&base, "k"), Some(&strings(&["base"])[..]));
        assert!(overlay.effective(&base, "only").is_none());
    }

    #[test]
    fn from_config_maps_kinds() {
        let cfg = ActionConfig::new(ActionKind::Upsert, "k")
            .with_value("v")
            .with_from_attribute("a");
        let action = Action::from_config(0, &cfg).expect("build");
        assert_eq!(action.kind(), ActionKind::Upsert);
        assert_eq!(action.key(), "k");

        let action =
            Action::from_config(0, &ActionConfig::new(ActionKind::Delete, "gone")).expect("build");
        assert_eq!(action, Action::Delete { key: "gone".into() });
    }

    #[test]
    fn from_config_rejects_unknown_kind() {
        let cfg = ActionConfig::new("hash", "k").with_value("v");
        assert_eq!(
            Action::from_config(3, &cfg),
            Err(ConfigError::UnknownActionKind {
                index: 3,
                action: "hash".into()
            })
        );
    }
}
