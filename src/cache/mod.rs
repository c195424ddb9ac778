//! Cache module for memoizing API responses in memory
//!
//! This module provides an in-memory response cache with a configurable TTL
//! (time-to-live). Entries past their TTL are treated as absent, so a lookup
//! after expiry behaves exactly like a lookup that never hit the cache. The
//! cache holds raw JSON payloads and is cleared wholesale on demand; nothing
//! is persisted across process restarts.

mod store;

pub use store::ResponseCache;
