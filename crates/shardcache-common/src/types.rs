//! Core type definitions for ShardCache
//!
//! This module defines the value envelope exchanged with cache stores and
//! the identifier naming a single backend host.

use bytes::Bytes;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value envelope exchanged with cache stores.
///
/// The body is an opaque byte string with no length limit imposed by the
/// routing layer; the flag is a caller-defined tag round-tripped unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct Item {
    /// Value bytes
    pub body: Bytes,
    /// Opaque caller-defined tag
    pub flag: u32,
}

impl Item {
    /// Create a new item from a body and flag
    pub fn new(body: impl Into<Bytes>, flag: u32) -> Self {
        Self {
            body: body.into(),
            flag,
        }
    }

    /// Create an item holding an ASCII-decimal counter value (flag 0)
    #[must_use]
    pub fn from_counter(value: u64) -> Self {
        Self {
            body: Bytes::from(value.to_string()),
            flag: 0,
        }
    }

    /// Parse the body as an ASCII-decimal counter value
    ///
    /// Returns `None` when the body is not a valid unsigned decimal string.
    #[must_use]
    pub fn counter_value(&self) -> Option<u64> {
        std::str::from_utf8(&self.body).ok()?.parse().ok()
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bodies can be megabytes; show the length, not the contents.
        write!(f, "Item({} bytes, flag={})", self.body.len(), self.flag)
    }
}

/// Identifier naming one backend storage endpoint (an address string).
///
/// Hosts are immutable for the lifetime of a routing table; there is no
/// dynamic membership change in scope.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct HostAddr(String);

impl HostAddr {
    /// Create a new host address
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get the address as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the address bytes (routing hash input)
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for HostAddr {
    fn from(addr: &str) -> Self {
        Self(addr.to_string())
    }
}

impl fmt::Debug for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostAddr({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_round_trips_flag() {
        let item = Item::new(&b"value"[..], 2);
        assert_eq!(item.body, Bytes::from_static(b"value"));
        assert_eq!(item.flag, 2);
    }

    #[test]
    fn test_counter_value() {
        assert_eq!(Item::new(&b"3"[..], 4).counter_value(), Some(3));
        assert_eq!(Item::from_counter(8).counter_value(), Some(8));
        assert_eq!(Item::new(&b"value"[..], 0).counter_value(), None);
        assert_eq!(Item::new(&b""[..], 0).counter_value(), None);
    }

    #[test]
    fn test_host_addr_display() {
        let host = HostAddr::new("10.0.0.1:7900");
        assert_eq!(host.to_string(), "10.0.0.1:7900");
        assert_eq!(host.as_str(), "10.0.0.1:7900");
    }
}
