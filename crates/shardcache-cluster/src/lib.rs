//! ShardCache Cluster - Client-side routing over many cache hosts
//!
//! This crate turns a single-node key/value cache contract ([`Storage`])
//! into a distributed cache addressable across many backend hosts:
//! deterministic key→host routing, writes replicated across a replica
//! set, reads that fall back through the set when the primary cannot
//! serve, and concurrent multi-key fan-out that tolerates the failure of
//! individual hosts.
//!
//! Wire encoding, connection pooling, and reconnection belong to the
//! per-host [`Storage`] implementations, not to this crate.

pub mod cluster;
pub mod mem;
pub mod storage;

pub use cluster::ClusterStore;
pub use mem::MemStore;
pub use storage::Storage;

pub use shardcache_routing::RoutingTable;
