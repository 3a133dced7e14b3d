//! Mailcast Common - Shared types and utilities
//!
//! This crate provides the configuration, error taxonomy, and event types
//! shared across all Mailcast components.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
