// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Errors for the context processor node.

use context_processor_config::Error as ConfigError;

/// Errors returned by the processor node.
///
/// Applying a pipeline never fails; these come from configuration and from
/// the channel to the next node.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The processor configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The downstream channel is closed.
    #[error("Failed to send message downstream from `{processor}`: {error}")]
    ChannelSendError {
        /// Name of the sending processor.
        processor: String,
        /// Error details.
        error: String,
    },
}
