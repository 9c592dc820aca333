//! Order-preserving object container.
//!
//! Backed by `indexmap::IndexMap` so lookup stays average-O(1) while
//! iteration order matches insertion order. Keys are compared byte-exact by
//! default; a per-container flag switches to ASCII-case-insensitive
//! comparison (the parser's `key-lowercase` option), implemented by folding
//! the key to lowercase before it's used to index the map.

use crate::bytes::Bytes;
use crate::value::Value;
use indexmap::IndexMap;

/// An ordered key → value mapping. Each entry's `Value` is the *head* of a
/// same-key sibling chain; `ObjectMap` itself never stores more
/// than one `Value` per key.
#[derive(Clone, Debug, Default)]
pub struct ObjectMap {
    entries: IndexMap<Bytes, Value>,
    case_insensitive: bool,
}

impl ObjectMap {
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            entries: IndexMap::new(),
            case_insensitive,
        }
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn normalize(&self, key: &[u8]) -> Bytes {
        if self.case_insensitive {
            Bytes::owned(key.to_ascii_lowercase())
        } else {
            Bytes::owned(key.to_vec())
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, key: &[u8]) -> Option<&Value> {
        self.entries.get(&self.normalize(key))
    }

    /// Plain insert: replaces any existing entry outright (no sibling
    /// chaining, no merge). Used internally by `insert_chained` and
    /// `insert_merged` once they've decided what the new head should be.
    fn set(&mut self, key: &[u8], value: Value) {
        let normalized = self.normalize(key);
        self.entries.insert(normalized, value);
    }

    /// `object_insert_key`: if `key` already exists, `value` is
    /// appended to its sibling chain rather than replacing it.
    pub fn insert_chained(&mut self, key: &[u8], value: Value) {
        let normalized = self.normalize(key);
        match self.entries.get(&normalized) {
            Some(head) => head.chain_append(value),
            None => {
                self.entries.insert(normalized, value);
            }
        }
    }

    /// `object_replace_key`: unconditionally replaces the whole chain.
    pub fn replace(&mut self, key: &[u8], value: Value) {
        self.set(key, value);
    }

    /// `object_insert_key_merged`: if both the existing head and the new
    /// value are objects, recursively merge members (higher `priority`
    /// value wins on conflict); otherwise falls back to chaining.
    pub fn insert_merged(&mut self, key: &[u8], value: Value) {
        let normalized = self.normalize(key);
        let existing = self.entries.get(&normalized).cloned();
        match existing {
            Some(head) if head.is_object() && value.is_object() => {
                head.merge_object_from(&value);
            }
            Some(head) => head.chain_append(value),
            None => {
                self.entries.insert(normalized, value);
            }
        }
    }

    pub fn delete(&mut self, key: &[u8]) -> Option<Value> {
        self.entries.shift_remove(&self.normalize(key))
    }

    pub fn pop(&mut self, key: &[u8]) -> Option<Value> {
        self.delete(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.entries.keys()
    }
}

impl PartialEq for ObjectMap {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries
            .iter()
            .all(|(k, v)| other.entries.get(k).is_some_and(|ov| v.deep_eq(ov)))
    }
}
impl Eq for ObjectMap {}
