//! On-disk snapshots
//!
//! Used to keep the temperature cache across restarts, so the first poll after
//! a restart in the evening still knows today's high.

mod manager;

pub use manager::{CacheManager, CachedData};
