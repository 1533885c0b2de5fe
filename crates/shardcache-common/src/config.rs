//! Configuration types for ShardCache
//!
//! This module defines the tuning knobs of the routing layer: the
//! replication factor, the write acknowledgement quorum, and the per-host
//! operation timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Write acknowledgement policy.
///
/// How many replicas must acknowledge a write (set/append/delete) before
/// the operation counts as successful. Writes are always dispatched to the
/// full replica set regardless of policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteQuorum {
    /// At least one replica acknowledges (default)
    One,
    /// A strict majority of the replica set acknowledges
    Majority,
    /// Every replica acknowledges
    All,
}

impl WriteQuorum {
    /// Number of acknowledgements required for a replica set of the given size
    #[must_use]
    pub fn required(&self, replicas: usize) -> usize {
        match self {
            Self::One => 1,
            Self::Majority => replicas / 2 + 1,
            Self::All => replicas,
        }
    }
}

impl Default for WriteQuorum {
    fn default() -> Self {
        Self::One
    }
}

/// Cluster routing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Replication factor R: how many hosts hold each key.
    /// Clamped to the number of configured hosts.
    pub replicas: usize,
    /// Write acknowledgement quorum
    pub write_quorum: WriteQuorum,
    /// Per-host operation timeout (milliseconds). A timeout on one host
    /// aborts only that host's in-flight request.
    pub op_timeout_ms: u64,
}

impl ClusterConfig {
    /// Per-host operation timeout as a [`Duration`]
    #[must_use]
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            replicas: 2,
            write_quorum: WriteQuorum::default(),
            op_timeout_ms: 2000,
        }
    }
}
