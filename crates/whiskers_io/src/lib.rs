//! # Whiskers IO
//!
//! Persistence collaborator for whiskers.
//!
//! This crate provides:
//! - Structured error handling
//! - Hex definition codes for sharing a single cat
//! - Named cat collections in memory, or on disk as gzip JSON or rkyv archives

/// Error types and result aliases for I/O operations
pub mod error;
/// Named collections and snapshot files
pub mod persistence;
/// JSON and definition-code helpers
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{
    restore_collection, save_registry, CatCollection, CatStore, FileStore, MemoryStore,
    StoreFormat,
};
pub use serialization::{from_definition_code, from_json, to_definition_code, to_json};
