//! ShardCache Routing - Deterministic key placement
//!
//! This crate maps cache keys to ordered replica sets over a fixed host
//! list using HRW (Highest Random Weight / rendezvous) hashing:
//! `score(host) = hash(host, hash(key))`, replicas are the top-R hosts by
//! score. The mapping is a pure function of the key and the host set, so
//! repeated reads and writes for the same key always target the same
//! hosts, and removing a host only remaps the keys that host owned.

pub mod table;

pub use table::RoutingTable;
