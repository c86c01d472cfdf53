//! Hierarchical key-value configuration for boto client libraries.
//!
//! This crate resolves an ordered list of candidate INI files (from an
//! explicit path, environment variables, or the default system/user
//! locations), parses them with recursive `#import` support, applies
//! INI-style cross-section defaults, and exposes typed accessors plus file-
//! and remote-persistence operations. An optional redaction mode keeps real
//! AWS credentials out of process memory and re-reads them from disk on
//! access.

pub mod constants;
mod env;
mod error;
mod ini;
mod locations;
mod persistence;
pub mod remote;
mod store;

pub use env::{EnvSnapshot, env_var_or_none};
pub use error::ConfigError;
pub use locations::ConfigLocations;
pub use remote::{KeyValueDomain, KeyValueStore, MemoryKeyValueStore};
pub use store::ConfigStore;
