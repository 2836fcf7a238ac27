//! Application-level utilities for the Pocket CLI.
//!
//! This module provides:
//! - Lazily loaded configuration and path resolution
//! - Passphrase handling with retry logic and first-run bootstrap

mod context;
mod session;

// Re-export public API
pub use context::AppContext;
