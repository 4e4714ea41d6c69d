//! In-memory caching of upstream API responses
//!
//! Provides TTL-based caching so repeated lookups don't hammer the
//! third-party APIs, and so stale data can be served when they are down.

mod manager;

pub use manager::{Cached, MemoryCache};
