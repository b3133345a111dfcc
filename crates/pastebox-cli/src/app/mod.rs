//! Application-level utilities for the Pastebox CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Resolution of the config path, database URL and store settings

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_database_url;
