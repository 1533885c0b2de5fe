//! Routing table: key → ordered replica set
//!
//! HRW (rendezvous) hashing over the configured host list. Every host is
//! scored per key with `xxh64(host_bytes, seed = xxh64(key))` and the
//! replica set is the top `min(R, len(hosts))` hosts by score, ordered
//! descending. The first element is the primary read target; the rest are
//! backups that also receive writes.

use shardcache_common::{Error, HostAddr, Result};
use std::collections::HashSet;
use xxhash_rust::xxh64::xxh64;

/// Deterministic mapping from key to an ordered list of candidate hosts.
///
/// Constructed once from a static host list and read-only thereafter.
#[derive(Clone, Debug)]
pub struct RoutingTable {
    hosts: Vec<HostAddr>,
    factor: usize,
}

impl RoutingTable {
    /// Create a routing table over the given hosts with replication
    /// factor `replicas`.
    ///
    /// The factor is clamped to the number of hosts. An empty host list,
    /// a duplicate host, or a zero factor is a configuration error; a key
    /// always maps to at least one host once construction succeeds.
    pub fn new(hosts: Vec<HostAddr>, replicas: usize) -> Result<Self> {
        if hosts.is_empty() {
            return Err(Error::configuration("host list is empty"));
        }
        if replicas == 0 {
            return Err(Error::configuration("replication factor must be >= 1"));
        }
        let mut seen = HashSet::new();
        for host in &hosts {
            if !seen.insert(host) {
                return Err(Error::configuration(format!("duplicate host: {host}")));
            }
        }
        let factor = replicas.min(hosts.len());
        Ok(Self { hosts, factor })
    }

    /// Ordered replica set for a key: exactly `min(R, len(hosts))`
    /// distinct hosts, highest HRW score first.
    #[must_use]
    pub fn replicas(&self, key: &str) -> Vec<HostAddr> {
        let key_hash = xxh64(key.as_bytes(), 0);

        let mut scored: Vec<(&HostAddr, u64)> = self
            .hosts
            .iter()
            .map(|host| (host, xxh64(host.as_bytes(), key_hash)))
            .collect();

        // Score ties are broken by address so the order is total.
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        scored.truncate(self.factor);

        scored.into_iter().map(|(host, _)| host.clone()).collect()
    }

    /// Primary host for a key: the first element of [`Self::replicas`],
    /// the preferred read target.
    #[must_use]
    pub fn locate(&self, key: &str) -> HostAddr {
        let key_hash = xxh64(key.as_bytes(), 0);

        // Top-1 selection without building the full sorted list. The host
        // list is non-empty by construction.
        let mut best = &self.hosts[0];
        let mut best_score = xxh64(best.as_bytes(), key_hash);
        for host in &self.hosts[1..] {
            let score = xxh64(host.as_bytes(), key_hash);
            if score > best_score || (score == best_score && host < best) {
                best = host;
                best_score = score;
            }
        }
        best.clone()
    }

    /// All configured hosts, in construction order
    #[must_use]
    pub fn hosts(&self) -> &[HostAddr] {
        &self.hosts
    }

    /// Effective replication factor (after clamping)
    #[must_use]
    pub fn replication_factor(&self) -> usize {
        self.factor
    }
}
