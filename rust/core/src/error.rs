// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for map analysis.

/// Result type alias for map analysis.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analysing firing maps.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied argument is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested mode exists but has no implementation.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A value has more dimensions than the caller asked for.
    #[error("dimension mismatch: expected {expected} value(s), got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Input JSON could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
