//! Distributed store: replicated writes, fallback reads, batch fan-out
//!
//! [`ClusterStore`] orchestrates per-host [`Storage`] calls across the
//! hosts chosen by the routing table. Writes go to the full replica set
//! concurrently and succeed once the configured quorum acknowledges;
//! reads try the primary and fall through the replica set in order;
//! `get_multi` batches keys by primary host and runs one request per host
//! in parallel, dropping only the keys of hosts that fail.

use crate::storage::Storage;
use bytes::Bytes;
use futures::future::join_all;
use shardcache_common::{ClusterConfig, Error, HostAddr, Item, Result};
use shardcache_routing::RoutingTable;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// One write operation, dispatched identically to every replica
#[derive(Clone)]
enum WriteOp {
    Set { item: Item, noreply: bool },
    Append { suffix: Bytes },
    Delete,
}

impl WriteOp {
    fn name(&self) -> &'static str {
        match self {
            Self::Set { .. } => "set",
            Self::Append { .. } => "append",
            Self::Delete => "delete",
        }
    }
}

/// Client-side distributed cache over per-host [`Storage`] handles.
///
/// Holds one long-lived handle per host, created at construction and
/// reused for the process lifetime. The routing table and handle map are
/// fixed; there is no dynamic membership change.
pub struct ClusterStore {
    table: RoutingTable,
    backends: HashMap<HostAddr, Arc<dyn Storage>>,
    config: ClusterConfig,
}

impl fmt::Debug for ClusterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Backend handles are opaque trait objects; show the topology.
        f.debug_struct("ClusterStore")
            .field("hosts", &self.table.hosts().len())
            .field("replicas", &self.table.replication_factor())
            .field("write_quorum", &self.config.write_quorum)
            .finish()
    }
}

impl ClusterStore {
    /// Create a cluster store over the given per-host backends.
    ///
    /// The routing table is built from the backend keys (sorted, so the
    /// mapping does not depend on map iteration order) with the
    /// replication factor from `config`. An empty backend map is a
    /// configuration error.
    pub fn new(
        backends: HashMap<HostAddr, Arc<dyn Storage>>,
        config: ClusterConfig,
    ) -> Result<Self> {
        let mut hosts: Vec<HostAddr> = backends.keys().cloned().collect();
        hosts.sort();
        let table = RoutingTable::new(hosts, config.replicas)?;
        Ok(Self {
            table,
            backends,
            config,
        })
    }

    /// The routing table in use (read-only)
    #[must_use]
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    fn backend(&self, host: &HostAddr) -> Arc<dyn Storage> {
        // The table is built from the backend keys, so the lookup always hits.
        Arc::clone(&self.backends[host])
    }

    /// Wrap a per-host call in the configured per-operation timeout.
    /// A timeout aborts only that host's in-flight request.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.config.op_timeout(), call).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout),
        }
    }

    /// Fetch `key`, trying the primary first and falling through the
    /// replica set on a miss or host failure.
    ///
    /// Returns the item together with the host that served it; `Ok(None)`
    /// means the key is genuinely absent everywhere reachable. Only when
    /// every replica fails does the call error.
    pub async fn get(&self, key: &str) -> Result<Option<(Item, HostAddr)>> {
        let replica_set = self.table.replicas(key);
        let total = replica_set.len();
        let mut failed = 0;

        for host in replica_set {
            let store = self.backend(&host);
            match self.bounded(store.get(key)).await {
                Ok(Some(item)) => {
                    debug!(key, host = %host, "get served");
                    return Ok(Some((item, host)));
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(key, host = %host, %err, "replica read failed, falling back");
                    failed += 1;
                }
            }
        }

        if failed == total {
            error!(key, "get failed on every replica");
            return Err(Error::AllReplicasFailed(key.to_string()));
        }
        Ok(None)
    }

    /// Store `item` under `key` on every replica concurrently.
    ///
    /// Returns the hosts that acknowledged the write; fails with
    /// [`Error::QuorumNotMet`] when fewer than the configured quorum did.
    /// `noreply` is forwarded to each per-host call and does not change
    /// which hosts are targeted.
    pub async fn set(&self, key: &str, item: Item, noreply: bool) -> Result<Vec<HostAddr>> {
        self.broadcast(key, WriteOp::Set { item, noreply }).await
    }

    /// Append `suffix` to the value under `key` on every replica.
    ///
    /// A replica where the key holds no value is a no-op and does not
    /// count as an acknowledgement, matching single-node append semantics.
    pub async fn append(&self, key: &str, suffix: impl Into<Bytes>) -> Result<Vec<HostAddr>> {
        self.broadcast(
            key,
            WriteOp::Append {
                suffix: suffix.into(),
            },
        )
        .await
    }

    /// Remove `key` from every replica, so a stale copy cannot resurrect
    /// deleted data on a later fallback read. Returns the hosts that
    /// confirmed the deletion.
    pub async fn delete(&self, key: &str) -> Result<Vec<HostAddr>> {
        self.broadcast(key, WriteOp::Delete).await
    }

    /// Add `delta` to the ASCII-decimal counter under `key`.
    ///
    /// Runs against the host that would serve a get for this key: a
    /// replica that is unreachable or does not hold the key is skipped,
    /// like a read miss. `KeyNotFound` surfaces only when the key is
    /// absent on every reachable replica; a format error (`NotNumeric`)
    /// from a reachable replica propagates as-is. Returns the new value
    /// and the host that applied it.
    pub async fn incr(&self, key: &str, delta: u64) -> Result<(u64, HostAddr)> {
        let replica_set = self.table.replicas(key);
        let total = replica_set.len();
        let mut failed = 0;

        for host in replica_set {
            let store = self.backend(&host);
            match self.bounded(store.incr(key, delta)).await {
                Ok(value) => return Ok((value, host)),
                Err(Error::KeyNotFound(_)) => {}
                Err(err) if err.is_unavailable() => {
                    warn!(key, host = %host, %err, "replica incr failed, falling back");
                    failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if failed == total {
            error!(key, "incr failed on every replica");
            return Err(Error::AllReplicasFailed(key.to_string()));
        }
        Err(Error::KeyNotFound(key.to_string()))
    }

    /// Fetch many keys with one batched request per primary host, run
    /// concurrently.
    ///
    /// Duplicate keys collapse to one logical request; keys absent from
    /// every backend are omitted from the result. A failing or timed-out
    /// host omits only its own keys. Returns the aggregate map and the
    /// hosts a batch was dispatched to; errors only when no host could be
    /// contacted at all.
    pub async fn get_multi(
        &self,
        keys: &[String],
    ) -> Result<(HashMap<String, Item>, Vec<HostAddr>)> {
        // Collapse duplicates and group by serving host: one round-trip
        // per distinct host, independent of key count.
        let mut groups: HashMap<HostAddr, Vec<String>> = HashMap::new();
        let mut seen = HashSet::new();
        for key in keys {
            if seen.insert(key.as_str()) {
                groups
                    .entry(self.table.locate(key))
                    .or_default()
                    .push(key.clone());
            }
        }
        if groups.is_empty() {
            return Ok((HashMap::new(), Vec::new()));
        }

        let contacted: Vec<HostAddr> = groups.keys().cloned().collect();

        // Each per-host batch feeds its partial result to one aggregating
        // loop over a channel; there is no shared mutable map.
        let (tx, mut rx) = mpsc::channel(groups.len());
        for (host, batch) in groups {
            let store = self.backend(&host);
            let tx = tx.clone();
            let deadline = self.config.op_timeout();
            tokio::spawn(async move {
                let res = match timeout(deadline, store.get_multi(&batch)).await {
                    Ok(res) => res,
                    Err(_) => Err(Error::Timeout),
                };
                // The receiver only goes away when the caller is gone.
                let _ = tx.send((host, res)).await;
            });
        }
        drop(tx);

        let mut items = HashMap::new();
        let mut served = 0usize;
        while let Some((host, res)) = rx.recv().await {
            match res {
                Ok(batch) => {
                    debug!(host = %host, hits = batch.len(), "get_multi batch served");
                    served += 1;
                    items.extend(batch);
                }
                Err(err) => {
                    warn!(host = %host, %err, "get_multi batch failed, omitting its keys");
                }
            }
        }

        if served == 0 {
            error!("get_multi could not contact any host");
            return Err(Error::NoHostsReachable);
        }
        Ok((items, contacted))
    }

    /// Dispatch one write to every replica concurrently and count acks
    async fn broadcast(&self, key: &str, op: WriteOp) -> Result<Vec<HostAddr>> {
        let replica_set = self.table.replicas(key);
        let required = self.config.write_quorum.required(replica_set.len());
        let op_name = op.name();

        let mut dispatches = Vec::with_capacity(replica_set.len());
        for host in replica_set {
            let store = self.backend(&host);
            let key = key.to_string();
            let op = op.clone();
            let deadline = self.config.op_timeout();
            dispatches.push(async move {
                let call = async {
                    match op {
                        WriteOp::Set { item, noreply } => store.set(&key, item, noreply).await,
                        WriteOp::Append { suffix } => store.append(&key, &suffix).await,
                        WriteOp::Delete => store.delete(&key).await,
                    }
                };
                let res = match timeout(deadline, call).await {
                    Ok(res) => res,
                    Err(_) => Err(Error::Timeout),
                };
                (host, res)
            });
        }

        let mut acked = Vec::new();
        for (host, res) in join_all(dispatches).await {
            match res {
                Ok(true) => acked.push(host),
                Ok(false) => debug!(key, op = op_name, host = %host, "replica declined write"),
                Err(err) => warn!(key, op = op_name, host = %host, %err, "replica write failed"),
            }
        }

        if acked.len() < required {
            error!(
                key,
                op = op_name,
                acked = acked.len(),
                required,
                "write quorum not met"
            );
            return Err(Error::QuorumNotMet {
                acked: acked.len(),
                required,
            });
        }
        Ok(acked)
    }
}
