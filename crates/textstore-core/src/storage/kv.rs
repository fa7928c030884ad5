//! Key-value substrate abstraction
//!
//! Everything the store persists lives in a flat map from string key to
//! string value. Implementations serialize individual key operations but
//! offer no cross-key atomicity and no transactions; any read-modify-write
//! cycle belongs to the caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::error::KvResult;

/// Durable map from string key to string value.
pub trait Kv {
    /// Read a value. `None` means the key has never been written.
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Write a value, overwriting any previous one.
    fn put(&self, key: &str, value: &str) -> KvResult<()>;

    /// Remove a key. Removing an absent key is a no-op.
    fn delete(&self, key: &str) -> KvResult<()>;
}

/// In-memory substrate backed by a shared map.
///
/// `Clone` hands out another handle onto the same map, which is how the
/// tests model several writers racing on one substrate.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Kv for MemoryKv {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let entries = self.entries.lock().expect("kv map poisoned");
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self.entries.lock().expect("kv map poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let mut entries = self.entries.lock().expect("kv map poisoned");
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("nope").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let kv = MemoryKv::new();
        kv.put("k", "one").unwrap();
        kv.put("k", "two").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let kv = MemoryKv::new();
        kv.put("k", "v").unwrap();
        kv.delete("k").unwrap();
        kv.delete("k").unwrap();
        assert_eq!(kv.get("k").unwrap(), None);
    }

    #[test]
    fn test_clone_shares_the_substrate() {
        let a = MemoryKv::new();
        let b = a.clone();

        a.put("k", "from-a").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("from-a"));

        b.delete("k").unwrap();
        assert_eq!(a.get("k").unwrap(), None);
    }
}
