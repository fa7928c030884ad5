//! Metadata index
//!
//! The full ordered collection of file records is stored as one JSON
//! array under a single fixed key. There are no partial updates: callers
//! load the whole collection, mutate it in memory, and save the whole
//! collection back in one key write.

use uuid::Uuid;

use crate::models::FileRecord;

use super::error::{KvError, KvResult};
use super::kv::Kv;

/// Key holding the serialized record collection.
pub const INDEX_KEY: &str = "meta:index";

/// The authoritative catalog of file records.
#[derive(Debug, Clone)]
pub struct MetadataIndex<S> {
    kv: S,
}

impl<S: Kv> MetadataIndex<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Load the whole collection.
    ///
    /// A key that has never been written reads as an empty collection.
    /// A value that no longer parses is fatal for the whole store.
    pub fn load(&self) -> KvResult<Vec<FileRecord>> {
        match self.kv.get(INDEX_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| KvError::CorruptIndex {
                details: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the whole collection in a single key write.
    pub fn save(&self, records: &[FileRecord]) -> KvResult<()> {
        let json = serde_json::to_string(records)?;
        self.kv.put(INDEX_KEY, &json)
    }
}

/// Find a record by exact filename match, optionally ignoring one id.
///
/// The exclusion lets an update keep its record's own filename without
/// tripping the uniqueness check.
pub fn find_by_filename<'a>(
    records: &'a [FileRecord],
    filename: &str,
    exclude_id: Option<Uuid>,
) -> Option<&'a FileRecord> {
    records
        .iter()
        .find(|r| r.filename == filename && exclude_id.map_or(true, |id| r.id != id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryKv;

    fn record(filename: &str) -> FileRecord {
        FileRecord::new(filename, filename, "")
    }

    #[test]
    fn test_load_empty_when_never_written() {
        let index = MetadataIndex::new(MemoryKv::new());
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let index = MetadataIndex::new(MemoryKv::new());
        let records = vec![record("a.txt"), record("b.txt")];

        index.save(&records).unwrap();
        let loaded = index.load().unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_preserves_order() {
        let index = MetadataIndex::new(MemoryKv::new());
        let records = vec![record("z.txt"), record("a.txt"), record("m.txt")];

        index.save(&records).unwrap();
        let names: Vec<_> = index
            .load()
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();

        assert_eq!(names, vec!["z.txt", "a.txt", "m.txt"]);
    }

    #[test]
    fn test_corrupt_value_is_fatal() {
        let kv = MemoryKv::new();
        kv.put(INDEX_KEY, "not json at all").unwrap();

        let index = MetadataIndex::new(kv);
        let err = index.load().unwrap_err();
        assert!(matches!(err, KvError::CorruptIndex { .. }));
    }

    #[test]
    fn test_index_is_stored_under_fixed_key() {
        let kv = MemoryKv::new();
        let index = MetadataIndex::new(kv.clone());

        index.save(&[record("a.txt")]).unwrap();

        let raw = kv.get("meta:index").unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("a.txt"));
    }

    #[test]
    fn test_find_by_filename_exact_match() {
        let records = vec![record("a.txt"), record("A.txt")];

        assert_eq!(
            find_by_filename(&records, "a.txt", None).map(|r| r.id),
            Some(records[0].id)
        );
        assert_eq!(
            find_by_filename(&records, "A.txt", None).map(|r| r.id),
            Some(records[1].id)
        );
        assert!(find_by_filename(&records, "b.txt", None).is_none());
    }

    #[test]
    fn test_find_by_filename_excludes_id() {
        let records = vec![record("a.txt")];
        let own_id = records[0].id;

        assert!(find_by_filename(&records, "a.txt", Some(own_id)).is_none());
        assert!(find_by_filename(&records, "a.txt", Some(Uuid::new_v4())).is_some());
    }
}
