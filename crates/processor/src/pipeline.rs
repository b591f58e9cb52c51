// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Ordered, immutable list of actions applied to the metadata of each request.

use crate::action::{Action, Overlay};
use crate::attributes::Attributes;
use crate::metadata::{Metadata, RequestContext};
use context_processor_config::{ActionConfig, Config, Error as ConfigError};

/// Runs the configured actions, in order, against the metadata of a request.
///
/// A pipeline is never mutated once built, so a single instance can be shared
/// (e.g. behind an `Arc`) by any number of concurrent callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPipeline {
    actions: Vec<Action>,
}

impl ActionPipeline {
    /// Creates a pipeline from already-built actions.
    #[must_use]
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Validates `config` and builds every action it lists.
    ///
    /// Fails on the first invalid or unknown action; no pipeline is produced
    /// with an action left out.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut builder = ActionPipelineBuilder::new();
        for action in &config.actions {
            builder.add_action(action)?;
        }
        let pipeline = builder.build()?;
        tracing::debug!(
            name: "context_processor.pipeline.built",
            actions = pipeline.len()
        );
        Ok(pipeline)
    }

    /// The actions, in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true when the pipeline has no action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns a new context whose metadata is the result of running every
    /// action over the metadata of `ctx`.
    #[must_use]
    pub fn apply(&self, ctx: &RequestContext, attributes: &Attributes) -> RequestContext {
        ctx.with_metadata(self.apply_metadata(&ctx.metadata, attributes))
    }

    /// Runs every action over `base` and returns the merged metadata.
    ///
    /// Each call works on its own overlay; later actions see the writes of
    /// earlier ones. Keys no action touched are carried through from `base`.
    #[must_use]
    pub fn apply_metadata(&self, base: &Metadata, attributes: &Attributes) -> Metadata {
        let mut overlay = Overlay::new();
        for action in &self.actions {
            action.execute(&mut overlay, base, attributes);
        }
        overlay.merge_into(base)
    }
}

/// Builds a pipeline one configuration record at a time.
///
/// A record that fails to build is reported by [`add_action`] and also
/// remembered, so that [`build`] refuses to return a pipeline missing it.
///
/// [`add_action`]: ActionPipelineBuilder::add_action
/// [`build`]: ActionPipelineBuilder::build
#[derive(Debug, Default)]
pub struct ActionPipelineBuilder {
    actions: Vec<Action>,
    added: usize,
    first_error: Option<ConfigError>,
}

impl ActionPipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the next action and appends it to the pipeline.
    pub fn add_action(&mut self, config: &ActionConfig) -> Result<(), ConfigError> {
        let index = self.added;
        self.added += 1;
        match Action::from_config(index, config) {
            Ok(action) => {
                self.actions.push(action);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    name: "context_processor.pipeline.invalid_action",
                    index,
                    error = %e
                );
                if self.first_error.is_none() {
                    self.first_error = Some(e.clone());
                }
                Err(e)
            }
        }
    }

    /// Finishes the pipeline.
    ///
    /// Returns the first error seen by [`ActionPipelineBuilder::add_action`],
    /// if any, or [`ConfigError::MissingActions`] when nothing was added.
    pub fn build(self) -> Result<ActionPipeline, ConfigError> {
        if let Some(e) = self.first_error {
            return Err(e);
        }
        if self.actions.is_empty() {
            return Err(ConfigError::MissingActions);
        }
        Ok(ActionPipeline::new(self.actions))
    }
}
