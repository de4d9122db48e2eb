//! ecweather library
//!
//! Normalizes Environment Canada citypage documents into canonical current,
//! daily and hourly weather records. Exposed for the binary and for
//! integration tests.

pub mod cache;
pub mod cli;
pub mod data;
pub mod engine;
pub mod provider;
pub mod refresh;
pub mod report;
