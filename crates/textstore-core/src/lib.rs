//! Textstore Core Library
//!
//! This crate provides the core functionality for textstore, a
//! single-admin store for small text files kept in a flat key-value
//! substrate. Each file is addressable internally by an opaque id and
//! externally by a unique public filename.
//!
//! # Architecture
//!
//! All metadata lives in one index value (`meta:index`, a JSON array of
//! records); each body lives under its own key (`content:<id>`). Every
//! mutation loads the full index, edits it in memory, validates the
//! uniqueness invariants, writes the index back, then writes or deletes
//! the body. The substrate offers no cross-key transactions, so the
//! index write always comes first and concurrent writers are
//! last-save-wins; see the `store` module docs.
//!
//! # Quick Start
//!
//! ```text
//! let kv = FsKv::open(config.kv_dir())?;
//! let store = FileStore::new(kv);
//!
//! // Create a file
//! let file = store.create(FileInput {
//!     filename: Some("notes.txt".into()),
//!     title: None,
//!     content: Some("hello".into()),
//! })?;
//!
//! // Fetch it through the public read path
//! let body = store.get_by_filename("notes.txt")?;
//! ```
//!
//! # Modules
//!
//! - `store`: CRUD surface over the index and the content blobs
//! - `models`: the file record and input normalization
//! - `storage`: key-value substrate, metadata index, content blobs
//! - `bundle`: versioned export/import bundle codec
//! - `config`: application configuration

pub mod bundle;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use bundle::{Bundle, BundleEntry, ImportSummary, BUNDLE_VERSION};
pub use config::Config;
pub use models::{FileRecord, DEFAULT_FILENAME, TEXT_PLAIN};
pub use storage::{ContentBlobs, FsKv, Kv, KvError, MemoryKv, MetadataIndex};
pub use store::{FileInput, FileStore, FileWithContent, StoreError, StoreResult};
