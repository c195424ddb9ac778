//! dashtop library
//!
//! This module exposes the cache, chart, CLI, data, endpoint, and live
//! modules for use in integration tests.

pub mod cache;
pub mod charts;
pub mod cli;
pub mod data;
pub mod endpoint;
pub mod live;
