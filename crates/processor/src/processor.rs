// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Context processor node.
//!
//! Rewrites the request metadata attached to each telemetry item using the
//! item's resource attributes, then forwards the item unchanged otherwise.
//!
//! Example configuration (YAML):
//! ```yaml
//! actions:
//!   - action: insert
//!     key: tenant
//!     from_attribute: tenant.id
//!     value: default
//!   - action: delete
//!     key: x-internal
//! ```

use crate::error::Error;
use crate::message::{EffectHandler, Message, NodeControlMsg, Processor};
use crate::metrics::ContextProcessorMetrics;
use crate::pdata::Pdata;
use crate::pipeline::ActionPipeline;
use async_trait::async_trait;
use context_processor_config::{Config, Error as ConfigError};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;

/// URN for the ContextProcessor
pub const CONTEXT_PROCESSOR_URN: &str = "urn:otel:processor:context";

/// Processor that rewrites the request context of each item it receives.
pub struct ContextProcessor {
    pipeline: Arc<ActionPipeline>,
    metrics: ContextProcessorMetrics,
}

impl ContextProcessor {
    /// Creates a processor running `pipeline`.
    #[must_use]
    pub fn new(pipeline: Arc<ActionPipeline>) -> Self {
        Self {
            pipeline,
            metrics: ContextProcessorMetrics::default(),
        }
    }

    /// Creates a processor from its user configuration.
    pub fn from_config(config: &Value) -> Result<Self, ConfigError> {
        let pipeline = build_pipeline(config)?;
        tracing::info!(
            name: "context_processor.created",
            urn = CONTEXT_PROCESSOR_URN,
            actions = pipeline.len()
        );
        Ok(Self::new(Arc::new(pipeline)))
    }

    /// The pipeline currently in use.
    #[must_use]
    pub fn pipeline(&self) -> &Arc<ActionPipeline> {
        &self.pipeline
    }

    /// Current metric values.
    #[must_use]
    pub fn metrics(&self) -> ContextProcessorMetrics {
        self.metrics.snapshot()
    }

    /// Swaps in a pipeline built from `config`.
    ///
    /// An invalid configuration leaves the current pipeline in place.
    fn reconfigure(&mut self, config: &Value) {
        match build_pipeline(config) {
            Ok(pipeline) => {
                tracing::info!(
                    name: "context_processor.config.reloaded",
                    actions = pipeline.len()
                );
                self.pipeline = Arc::new(pipeline);
                self.metrics.add_reload(true);
            }
            Err(e) => {
                tracing::warn!(
                    name: "context_processor.config.reload_failed",
                    error = %e,
                    message = "Keeping the previous configuration"
                );
                self.metrics.add_reload(false);
            }
        }
    }
}

fn build_pipeline(config: &Value) -> Result<ActionPipeline, ConfigError> {
    let config = Config::from_json(config)?;
    ActionPipeline::from_config(&config)
}

/// Factory function to create a ContextProcessor.
///
/// Builds the processor from its user configuration and the effect handler it
/// uses to forward rewritten items to `downstream`.
pub fn create_context_processor(
    node: impl Into<Cow<'static, str>>,
    config: &Value,
    downstream: mpsc::Sender<Pdata>,
) -> Result<(ContextProcessor, EffectHandler<Pdata>), ConfigError> {
    let processor = ContextProcessor::from_config(config)?;
    Ok((processor, EffectHandler::new(node, downstream)))
}

#[async_trait]
impl Processor<Pdata> for ContextProcessor {
    async fn process(
        &mut self,
        msg: Message<Pdata>,
        effect_handler: &mut EffectHandler<Pdata>,
    ) -> Result<(), Error> {
        match msg {
            Message::Control(NodeControlMsg::Config { config }) => {
                self.reconfigure(&config);
                Ok(())
            }
            Message::Control(NodeControlMsg::CollectTelemetry) => {
                let m = self.metrics.snapshot();
                tracing::debug!(
                    name: "context_processor.metrics",
                    processor = effect_handler.processor_id(),
                    pdata_processed = m.pdata_processed,
                    config_reloads = m.config_reloads,
                    config_reload_failures = m.config_reload_failures
                );
                Ok(())
            }
            Message::Control(NodeControlMsg::Shutdown { reason }) => {
                tracing::info!(
                    name: "context_processor.shutdown",
                    processor = effect_handler.processor_id(),
                    reason = %reason
                );
                Ok(())
            }
            Message::PData(pdata) => {
                let context = self
                    .pipeline
                    .apply(pdata.context(), pdata.resource_attributes());
                self.metrics.add_pdata();
                effect_handler
                    .send_message(pdata.with_context(context))
                    .await
            }
        }
    }
}
