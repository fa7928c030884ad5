//! Key-value persistence layer
//!
//! The flat string-to-string substrate everything is stored in, plus the
//! two repositories built directly on it: the metadata index (one JSON
//! array under a fixed key) and the content blobs (one body per record).

mod content;
mod error;
mod fs;
mod index;
mod kv;

pub use content::{ContentBlobs, CONTENT_PREFIX};
pub use error::{KvError, KvResult};
pub use fs::FsKv;
pub use index::{find_by_filename, MetadataIndex, INDEX_KEY};
pub use kv::{Kv, MemoryKv};
