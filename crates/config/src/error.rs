// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Errors for the configuration crate.

/// Errors that can occur while loading, validating, or building the context
/// processor configuration.
///
/// All of these are raised before any request is processed. Once a pipeline
/// exists, applying it cannot fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The configuration does not list any action.
    #[error("Missing actions configuration")]
    MissingActions,

    /// An action has no key or an empty key.
    #[error("Missing action key (action #{index})")]
    MissingKey {
        /// Position of the offending action in the `actions` list.
        index: usize,
    },

    /// A non-delete action has neither `value` nor `from_attribute`.
    #[error(
        "Missing action source for key `{key}` (action #{index}), must be 'from_attribute' or 'value'"
    )]
    MissingSource {
        /// Position of the offending action in the `actions` list.
        index: usize,
        /// Target key of the offending action.
        key: String,
    },

    /// A delete action specifies `value` and/or `from_attribute`.
    #[error(
        "Action delete does not support 'from_attribute' and/or 'value' (key `{key}`, action #{index})"
    )]
    DeleteParamsNotAllowed {
        /// Position of the offending action in the `actions` list.
        index: usize,
        /// Target key of the offending action.
        key: String,
    },

    /// The action type is not one of `insert`, `update`, `upsert`, `delete`.
    #[error("Unknown action type `{action}` (action #{index})")]
    UnknownActionKind {
        /// Position of the offending action in the `actions` list.
        index: usize,
        /// The action type as written in the configuration.
        action: String,
    },

    /// The user configuration could not be parsed.
    #[error("Invalid user configuration: {error}")]
    InvalidUserConfig {
        /// Parser error details.
        error: String,
    },
}
