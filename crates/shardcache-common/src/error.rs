//! Error types for ShardCache
//!
//! This module defines the common error taxonomy used throughout the
//! routing layer. Key absence is never an error (it is `Option::None` or
//! omission from a batch result); errors here are configuration problems,
//! per-host soft failures, value-format problems, and aggregate failures
//! where no replica could serve an operation.

use thiserror::Error;

/// Common result type for ShardCache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for ShardCache
#[derive(Debug, Error)]
pub enum Error {
    // Construction-time errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Per-host soft failures
    #[error("host unavailable: {host}")]
    HostUnavailable { host: String },

    #[error("request timeout")]
    Timeout,

    #[error("storage error: {0}")]
    Storage(String),

    // Value errors
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("non-numeric value for key: {0}")]
    NotNumeric(String),

    // Aggregate failures
    #[error("write quorum not met: {acked} of {required} required acks")]
    QuorumNotMet { acked: usize, required: usize },

    #[error("all replicas failed for key: {0}")]
    AllReplicasFailed(String),

    #[error("no hosts reachable")]
    NoHostsReachable,
}

impl Error {
    /// Create a new configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a host-unavailable error
    pub fn host_unavailable(host: impl Into<String>) -> Self {
        Self::HostUnavailable { host: host.into() }
    }

    /// Check if this error means the host declined to serve, as opposed to
    /// answering with a definitive result. Soft failures trigger replica
    /// fallback on reads and ack accounting on writes; anything else is a
    /// real answer and propagates.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::HostUnavailable { .. } | Self::Timeout | Self::Storage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_unavailable() {
        assert!(Error::Timeout.is_unavailable());
        assert!(Error::host_unavailable("h1:7900").is_unavailable());
        assert!(Error::storage("connection reset").is_unavailable());
        assert!(!Error::KeyNotFound("k".into()).is_unavailable());
        assert!(!Error::NotNumeric("k".into()).is_unavailable());
    }
}
