//! ShardCache Common - Shared types and utilities
//!
//! This crate provides the value envelope, host identifier, error
//! definitions, and configuration types used across all ShardCache
//! components.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ClusterConfig, WriteQuorum};
pub use error::{Error, Result};
pub use types::*;
