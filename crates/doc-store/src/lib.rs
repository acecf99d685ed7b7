//! # Taggable Document Stores
//!
//! Adapters behind [`taggable_core::DocumentStore`]:
//!
//! - [`MemoryStore`] keeps collections in process memory
//! - [`JsonFileStore`] persists them as a single versioned JSON file
//!
//! Both evaluate the core [`Filter`](taggable_core::Filter) directly and
//! return records in insertion order.

mod config;
mod eval;
mod file;
mod memory;

pub use config::{StoreBackend, StoreConfig, DEFAULT_STORE_PATH};
pub use eval::{condition_matches, matches};
pub use file::{JsonFileStore, STORE_SCHEMA_VERSION};
pub use memory::MemoryStore;
