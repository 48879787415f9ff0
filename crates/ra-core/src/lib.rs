//! Core types and utilities for the research assistant
//!
//! # Modules
//!
//! - `config`: Environment loading and `AgentConfig`
//! - `error`: Error types and Result alias

pub mod config;
pub mod error;

// Re-exports
pub use config::AgentConfig;
pub use error::{Error, Result};
