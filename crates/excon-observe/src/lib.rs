//! Logging for the adapter.
//!
//! stdout belongs to the containerizer protocol, so every layer built here
//! writes to stderr (or journald).
mod logger;
pub use logger::*;
