//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `cards` - Card catalog listing
//! - `core` - Shared utilities (config loading, pipeline runner, report output)
//! - `demo` - Pipeline run on generated sample data
//! - `recommend` - Card recommendation from a transaction CSV

pub mod cards;
pub mod core;
pub mod demo;
pub mod recommend;

// Re-export command functions for main.rs
pub use cards::*;
pub use self::core::*;
pub use demo::*;
pub use recommend::*;
