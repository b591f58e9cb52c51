// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Metrics for the context processor node.

/// Counters maintained by a [`ContextProcessor`](crate::processor::ContextProcessor).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContextProcessorMetrics {
    /// Number of items whose context was rewritten and forwarded.
    pub pdata_processed: u64,
    /// Number of configuration updates applied.
    pub config_reloads: u64,
    /// Number of configuration updates rejected.
    pub config_reload_failures: u64,
}

impl ContextProcessorMetrics {
    pub(crate) fn add_pdata(&mut self) {
        self.pdata_processed += 1;
    }

    pub(crate) fn add_reload(&mut self, ok: bool) {
        if ok {
            self.config_reloads += 1;
        } else {
            self.config_reload_failures += 1;
        }
    }

    /// Returns a copy of the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        *self
    }
}
