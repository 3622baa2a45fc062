//! Ferry Core Library
//!
//! This crate provides the shared vocabulary and configuration used across
//! ferry components: the storage backend kinds and the environment-driven
//! process configuration.

pub mod config;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use storage_types::StorageKind;
