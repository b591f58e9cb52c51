// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Messages exchanged with a processor node and the handle it uses to emit
//! data downstream.

use crate::error::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Cow;
use tokio::sync::mpsc;

/// Control messages sent to a node by the host pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeControlMsg {
    /// New user configuration for the node.
    Config {
        /// The node configuration, in the same form accepted at creation.
        config: Value,
    },
    /// Request to report the node metrics.
    CollectTelemetry,
    /// The pipeline is shutting down.
    Shutdown {
        /// Why the pipeline is shutting down.
        reason: String,
    },
}

/// A message delivered to a processor.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<PData> {
    /// Control message.
    Control(NodeControlMsg),
    /// Telemetry data.
    PData(PData),
}

impl<PData> Message<PData> {
    /// Wraps a data item.
    pub fn data_msg(data: PData) -> Self {
        Message::PData(data)
    }

    /// Wraps a control message.
    pub fn control_msg(msg: NodeControlMsg) -> Self {
        Message::Control(msg)
    }
}

/// Handle used by a processor to send data to the next node.
#[derive(Debug, Clone)]
pub struct EffectHandler<PData> {
    processor: Cow<'static, str>,
    sender: mpsc::Sender<PData>,
}

impl<PData: Send> EffectHandler<PData> {
    /// Creates a handle for the processor named `processor`.
    pub fn new(processor: impl Into<Cow<'static, str>>, sender: mpsc::Sender<PData>) -> Self {
        Self {
            processor: processor.into(),
            sender,
        }
    }

    /// Name of the processor owning this handle.
    #[must_use]
    pub fn processor_id(&self) -> &str {
        &self.processor
    }

    /// Sends `data` to the next node, waiting for channel capacity.
    pub async fn send_message(&self, data: PData) -> Result<(), Error> {
        self.sender
            .send(data)
            .await
            .map_err(|e| Error::ChannelSendError {
                processor: self.processor.to_string(),
                error: e.to_string(),
            })
    }
}

/// A node that consumes messages and emits data through an [`EffectHandler`].
#[async_trait]
pub trait Processor<PData: Send> {
    /// Handles one message.
    async fn process(
        &mut self,
        msg: Message<PData>,
        effect_handler: &mut EffectHandler<PData>,
    ) -> Result<(), Error>;
}
