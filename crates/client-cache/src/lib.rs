//! Cache-aside layer in front of a remote access-decision provider.
//!
//! [`CachedAccessClient`] wraps any [`AccessClient`] and keeps three
//! independent expire-after-write stores: policy decisions keyed by
//! input, group memberships keyed by actor, and protected-person flags
//! keyed by identity. Only successful remote responses are cached;
//! entries disappear by time-to-live expiry alone.

pub mod client;
pub mod config;
pub mod store;

pub use client::{AccessClient, CachedAccessClient};
pub use config::CacheConfig;
pub use store::ExpiringCache;
