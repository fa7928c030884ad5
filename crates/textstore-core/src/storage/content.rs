//! Content blob repository
//!
//! One raw text body per record, stored verbatim under a key derived
//! from the record id. Absence is not an error: a missing blob reads as
//! empty content.

use uuid::Uuid;

use super::error::KvResult;
use super::kv::Kv;

/// Prefix of every content blob key.
pub const CONTENT_PREFIX: &str = "content:";

/// Bodies of the stored files, addressed by record id.
#[derive(Debug, Clone)]
pub struct ContentBlobs<S> {
    kv: S,
}

impl<S: Kv> ContentBlobs<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    fn key(id: Uuid) -> String {
        format!("{}{}", CONTENT_PREFIX, id)
    }

    /// Read a body. An absent blob reads as empty content.
    pub fn get(&self, id: Uuid) -> KvResult<String> {
        Ok(self.kv.get(&Self::key(id))?.unwrap_or_default())
    }

    /// Write a body, overwriting any previous one.
    pub fn put(&self, id: Uuid, content: &str) -> KvResult<()> {
        self.kv.put(&Self::key(id), content)
    }

    /// Remove a body. Removing an absent blob is a no-op.
    pub fn delete(&self, id: Uuid) -> KvResult<()> {
        self.kv.delete(&Self::key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryKv;

    #[test]
    fn test_missing_blob_reads_empty() {
        let blobs = ContentBlobs::new(MemoryKv::new());
        assert_eq!(blobs.get(Uuid::new_v4()).unwrap(), "");
    }

    #[test]
    fn test_put_get_round_trip() {
        let blobs = ContentBlobs::new(MemoryKv::new());
        let id = Uuid::new_v4();

        blobs.put(id, "hello\nworld").unwrap();
        assert_eq!(blobs.get(id).unwrap(), "hello\nworld");
    }

    #[test]
    fn test_content_stored_verbatim_under_prefixed_key() {
        let kv = MemoryKv::new();
        let blobs = ContentBlobs::new(kv.clone());
        let id = Uuid::new_v4();

        blobs.put(id, "héllo\n").unwrap();

        let raw = kv.get(&format!("content:{}", id)).unwrap();
        assert_eq!(raw.as_deref(), Some("héllo\n"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let blobs = ContentBlobs::new(MemoryKv::new());
        let id = Uuid::new_v4();

        blobs.put(id, "x").unwrap();
        blobs.delete(id).unwrap();
        blobs.delete(id).unwrap();

        assert_eq!(blobs.get(id).unwrap(), "");
    }
}
