// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry items flowing through the processor.

use crate::attributes::Attributes;
use crate::metadata::RequestContext;
use bytes::Bytes;

/// Kind of telemetry carried by an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalType {
    /// Log records.
    Logs,
    /// Metric data points.
    Metrics,
    /// Spans.
    Traces,
}

/// A telemetry item for a single resource, together with the context of the
/// request that carried it.
///
/// The payload is opaque to the processor and forwarded as is.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdata {
    context: RequestContext,
    resource_attributes: Attributes,
    signal: SignalType,
    payload: Bytes,
}

impl Pdata {
    /// Creates an item.
    #[must_use]
    pub fn new(
        context: RequestContext,
        resource_attributes: Attributes,
        signal: SignalType,
        payload: Bytes,
    ) -> Self {
        Self {
            context,
            resource_attributes,
            signal,
            payload,
        }
    }

    /// Context of the request that carried the item.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Attributes of the resource the item describes.
    #[must_use]
    pub fn resource_attributes(&self) -> &Attributes {
        &self.resource_attributes
    }

    /// Kind of telemetry in the payload.
    #[must_use]
    pub fn signal_type(&self) -> SignalType {
        self.signal
    }

    /// Encoded telemetry payload.
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Replaces the request context, keeping everything else.
    #[must_use]
    pub fn with_context(self, context: RequestContext) -> Self {
        Self { context, ..self }
    }
}
