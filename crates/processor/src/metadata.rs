// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Request metadata propagated alongside telemetry, and the context carrying it.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;

/// Client metadata attached to an incoming request.
///
/// Each key maps to an ordered list of values. Keys are kept sorted so that
/// rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values of `key`, or `None` if the key is absent.
    ///
    /// Exact matches win. Otherwise the first key equal to `key` ignoring
    /// ASCII case is used. A key mapped to an empty list counts as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        let values = &self.entries[self.resolve_key(key)?];
        if values.is_empty() {
            None
        } else {
            Some(values.as_slice())
        }
    }

    /// Returns the stored spelling of the key a lookup of `key` reads from.
    pub(crate) fn resolve_key(&self, key: &str) -> Option<&str> {
        if let Some((k, _)) = self.entries.get_key_value(key) {
            return Some(k.as_str());
        }
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(key))
            .map(String::as_str)
    }

    /// Returns true when `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets the values of `key`, returning the previous ones.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.entries.insert(key.into(), values)
    }

    /// Number of keys, including keys with no values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys and their values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub(crate) fn entries(&self) -> &BTreeMap<String, Vec<String>> {
        &self.entries
    }
}

impl From<BTreeMap<String, Vec<String>>> for Metadata {
    fn from(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }
}

impl From<HashMap<String, Vec<String>>> for Metadata {
    fn from(entries: HashMap<String, Vec<String>>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl<K, V, I> FromIterator<(K, I)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = V>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, values)| (k.into(), values.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Per-request context handed to the processor by the host pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Propagated client metadata.
    pub metadata: Metadata,
    /// Address of the client that sent the request, when known.
    pub peer_addr: Option<SocketAddr>,
}

impl RequestContext {
    /// Creates a context carrying `metadata` and no peer address.
    #[must_use]
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            peer_addr: None,
        }
    }

    /// Sets the peer address.
    #[must_use]
    pub fn with_peer_addr(mut self, peer_addr: SocketAddr) -> Self {
        self.peer_addr = Some(peer_addr);
        self
    }

    /// Returns a copy of this context with its metadata replaced.
    #[must_use]
    pub fn with_metadata(&self, metadata: Metadata) -> Self {
        Self {
            metadata,
            peer_addr: self.peer_addr,
        }
    }
}
