//! Filesystem-backed key-value substrate
//!
//! Stores one file per key under a root directory. Writes are atomic
//! (write to a temp file, then rename) so a key is never left in a
//! partially-written state. Key strings may contain characters that are
//! not safe in file names (the index key contains a colon), so keys are
//! percent-encoded into their file name.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::{KvError, KvResult};
use super::kv::Kv;

/// File-per-key substrate rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FsKv {
    root: PathBuf,
}

impl FsKv {
    /// Open the substrate, creating the root directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> KvResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| KvError::CreateDirectory {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Directory the key files live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key))
    }
}

impl Kv for FsKv {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::Read { path, source: e }),
        }
    }

    fn put(&self, key: &str, value: &str) -> KvResult<()> {
        atomic_write(&self.key_path(key), value.as_bytes())
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::from_io(e, path)),
        }
    }
}

/// Encode a key into a file name.
///
/// ASCII alphanumerics plus `.`, `_` and `-` pass through; every other
/// byte becomes `%XX`. The mapping is injective, so distinct keys can
/// never collide on disk.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(b as char),
            _ => {
                let _ = write!(out, "%{:02X}", b);
            }
        }
    }
    out
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> KvResult<()> {
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|source| KvError::Write {
        path: temp_path.clone(),
        source,
    })?;

    file.write_all(data).map_err(|source| KvError::Write {
        path: temp_path.clone(),
        source,
    })?;

    // Sync to disk before rename
    file.sync_all().map_err(|source| KvError::Write {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| KvError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key() {
        let dir = TempDir::new().unwrap();
        let kv = FsKv::open(dir.path()).unwrap();
        assert_eq!(kv.get("meta:index").unwrap(), None);
    }

    #[test]
    fn test_put_get_delete() {
        let dir = TempDir::new().unwrap();
        let kv = FsKv::open(dir.path()).unwrap();

        kv.put("meta:index", "[]").unwrap();
        assert_eq!(kv.get("meta:index").unwrap().as_deref(), Some("[]"));

        kv.put("meta:index", "[1]").unwrap();
        assert_eq!(kv.get("meta:index").unwrap().as_deref(), Some("[1]"));

        kv.delete("meta:index").unwrap();
        assert_eq!(kv.get("meta:index").unwrap(), None);

        // Deleting again is a no-op
        kv.delete("meta:index").unwrap();
    }

    #[test]
    fn test_values_persist_across_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let kv = FsKv::open(dir.path()).unwrap();
            kv.put("content:abc", "hello").unwrap();
        }

        let kv = FsKv::open(dir.path()).unwrap();
        assert_eq!(kv.get("content:abc").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_open_creates_root() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let kv = FsKv::open(&nested).unwrap();
        kv.put("k", "v").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_encode_key_passes_safe_chars() {
        assert_eq!(encode_key("abc.XYZ_09-"), "abc.XYZ_09-");
    }

    #[test]
    fn test_encode_key_escapes_unsafe_bytes() {
        assert_eq!(encode_key("meta:index"), "meta%3Aindex");
        assert_eq!(encode_key("a/b"), "a%2Fb");
    }

    #[test]
    fn test_encode_key_is_injective_for_percent() {
        // A literal "%3A" in a key must not collide with an encoded ":"
        assert_eq!(encode_key("a%3A"), "a%253A");
        assert_ne!(encode_key("a%3A"), encode_key("a:"));
    }

    #[test]
    fn test_distinct_keys_distinct_files() {
        let dir = TempDir::new().unwrap();
        let kv = FsKv::open(dir.path()).unwrap();

        kv.put("content:1", "one").unwrap();
        kv.put("content:2", "two").unwrap();

        assert_eq!(kv.get("content:1").unwrap().as_deref(), Some("one"));
        assert_eq!(kv.get("content:2").unwrap().as_deref(), Some("two"));
    }
}
