// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Context processor.
//!
//! Applies an ordered list of actions (insert, upsert, update, delete) to the
//! metadata propagated with a request, using the resource attributes of the
//! current telemetry item as a value source.
//!
//! Each run writes to a fresh [`Overlay`] layered over the request metadata:
//! reads see the overlay value first, then the request value. The
//! [`ActionPipeline`] itself is immutable once built and can be shared across
//! threads without locking.

pub mod action;
pub mod attributes;
pub mod error;
pub mod message;
pub mod metadata;
pub mod metrics;
pub mod pdata;
pub mod pipeline;
pub mod processor;

pub use action::{Action, ActionTarget, Overlay};
pub use attributes::{AnyValue, Attributes, KeyValue};
pub use metadata::{Metadata, RequestContext};
pub use pipeline::{ActionPipeline, ActionPipelineBuilder};
pub use processor::{CONTEXT_PROCESSOR_URN, ContextProcessor, create_context_processor};

pub use context_processor_config as config;
