//! # it-core
//!
//! Core types, errors, and configuration for issuetrack.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Identifiable, Timestamped)
//! - Display types (Color)
//! - Client configuration

pub mod error;
pub mod result;
pub mod traits;
pub mod types;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
