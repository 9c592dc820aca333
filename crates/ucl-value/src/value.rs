//! The value tree node.
//!
//! Every node is a `Value`, a cheap `Rc<RefCell<ValueData>>` handle. Besides
//! its tagged payload, each node carries an optional key, a priority in
//! `0..=15`, and a handful of boolean flags. Repeated keys within one
//! object don't overwrite each other — the second and later values are
//! chained onto the first value's `next` link, so `ObjectMap` never needs
//! to store more than one `Value` per key.

use crate::bytes::Bytes;
use crate::object::ObjectMap;
use crate::userdata::UserData;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Maximum explicit priority a value may carry.
pub const MAX_PRIORITY: u8 = 15;

/// Per-node bookkeeping flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueFlags {
    pub key_needs_escape: bool,
    pub key_owned: bool,
    pub value_owned: bool,
    pub multiline_string: bool,
}

/// The tagged payload a `Value` can hold.
#[derive(Clone, Debug)]
pub enum Tag {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Time(f64),
    String(Bytes),
    Array(Vec<Value>),
    Object(ObjectMap),
    UserData(UserData),
}

#[derive(Debug)]
pub struct ValueData {
    pub tag: Tag,
    pub key: Option<Bytes>,
    pub priority: u8,
    pub flags: ValueFlags,
    /// Next node in the same-key sibling chain. `None` for the tail.
    pub next: Option<Value>,
}

/// A handle to a node in the value tree. Clones share the same underlying
/// node (`Rc`), so cloning is O(1) and mutation through one handle is
/// visible through every other handle to the same node.
#[derive(Clone, Debug)]
pub struct Value(Rc<RefCell<ValueData>>);

impl Value {
    fn new(tag: Tag) -> Self {
        Value(Rc::new(RefCell::new(ValueData {
            tag,
            key: None,
            priority: 0,
            flags: ValueFlags::default(),
            next: None,
        })))
    }

    pub fn null() -> Self {
        Value::new(Tag::Null)
    }

    pub fn bool(b: bool) -> Self {
        Value::new(Tag::Bool(b))
    }

    pub fn int(i: i64) -> Self {
        Value::new(Tag::Int(i))
    }

    pub fn float(f: f64) -> Self {
        Value::new(Tag::Float(f))
    }

    pub fn time(seconds: f64) -> Self {
        Value::new(Tag::Time(seconds))
    }

    pub fn string(bytes: Bytes) -> Self {
        Value::new(Tag::String(bytes))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::new(Tag::Array(items))
    }

    pub fn object(map: ObjectMap) -> Self {
        Value::new(Tag::Object(map))
    }

    pub fn userdata(data: UserData) -> Self {
        Value::new(Tag::UserData(data))
    }

    pub fn borrow(&self) -> Ref<'_, ValueData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ValueData> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn key(&self) -> Option<Bytes> {
        self.0.borrow().key.clone()
    }

    pub fn set_key(&self, key: Bytes, needs_escape: bool) {
        let mut data = self.0.borrow_mut();
        data.key = Some(key);
        data.flags.key_owned = true;
        data.flags.key_needs_escape = needs_escape;
    }

    pub fn priority(&self) -> u8 {
        self.0.borrow().priority
    }

    pub fn set_priority(&self, priority: u8) {
        self.0.borrow_mut().priority = priority.min(MAX_PRIORITY);
    }

    pub fn flags(&self) -> ValueFlags {
        self.0.borrow().flags
    }

    pub fn set_multiline(&self, multiline: bool) {
        self.0.borrow_mut().flags.multiline_string = multiline;
    }

    pub fn is_null(&self) -> bool {
        matches!(self.0.borrow().tag, Tag::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self.0.borrow().tag, Tag::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.borrow().tag, Tag::Array(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.0.borrow().tag, Tag::String(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.0.borrow().tag {
            Tag::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.0.borrow().tag {
            Tag::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.0.borrow().tag {
            Tag::Float(f) => Some(f),
            Tag::Time(t) => Some(t),
            Tag::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<Bytes> {
        match &self.0.borrow().tag {
            Tag::String(b) => Some(b.clone()),
            _ => None,
        }
    }

    /// Appends `value` to the end of this node's same-key sibling chain.
    pub fn chain_append(&self, value: Value) {
        let mut cur = self.clone();
        loop {
            let next = cur.0.borrow().next.clone();
            match next {
                Some(n) => cur = n,
                None => break,
            }
        }
        cur.0.borrow_mut().next = Some(value);
    }

    /// The next value in this node's same-key sibling chain, if any.
    pub fn next_sibling(&self) -> Option<Value> {
        self.0.borrow().next.clone()
    }

    /// Iterates this node and its same-key siblings in chain order.
    pub fn chain_iter(&self) -> ChainIter {
        ChainIter {
            current: Some(self.clone()),
        }
    }

    pub fn chain_len(&self) -> usize {
        self.chain_iter().count()
    }

    /// `object_insert_key_merged` helper: merges `other`'s members into this
    /// object in place. `other` must be an object too. On key collision the
    /// member with the higher `priority` wins; equal priority keeps the
    /// existing (this object's) member and chains the new one as a sibling,
    /// mirroring `object_insert_key`'s default.
    pub fn merge_object_from(&self, other: &Value) {
        if self.ptr_eq(other) {
            return;
        }
        let other_entries: Vec<(Bytes, Value)> = {
            let other_data = other.0.borrow();
            match &other_data.tag {
                Tag::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                _ => return,
            }
        };
        let mut data = self.0.borrow_mut();
        if let Tag::Object(map) = &mut data.tag {
            for (key, incoming) in other_entries {
                match map.find(key.as_slice()) {
                    Some(existing) if incoming.priority() > existing.priority() => {
                        map.replace(key.as_slice(), incoming);
                    }
                    Some(existing) if existing.is_object() && incoming.is_object() => {
                        existing.merge_object_from(&incoming);
                    }
                    Some(existing) => existing.chain_append(incoming),
                    None => map.insert_chained(key.as_slice(), incoming),
                }
            }
        }
    }

    /// Structural equality: tags, payload, and (for objects/arrays)
    /// children must match. Keys, priority, and flags are bookkeeping and
    /// not part of value identity.
    pub fn deep_eq(&self, other: &Value) -> bool {
        let a = self.0.borrow();
        let b = other.0.borrow();
        match (&a.tag, &b.tag) {
            (Tag::Null, Tag::Null) => true,
            (Tag::Bool(x), Tag::Bool(y)) => x == y,
            (Tag::Int(x), Tag::Int(y)) => x == y,
            (Tag::Float(x), Tag::Float(y)) => x == y,
            (Tag::Time(x), Tag::Time(y)) => x == y,
            (Tag::String(x), Tag::String(y)) => x == y,
            (Tag::Array(x), Tag::Array(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| p.deep_eq(q))
            }
            (Tag::Object(x), Tag::Object(y)) => x == y,
            (Tag::UserData(x), Tag::UserData(y)) => x == y,
            _ => false,
        }
    }
}

pub struct ChainIter {
    current: Option<Value>,
}

impl Iterator for ChainIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let current = self.current.take()?;
        self.current = current.next_sibling();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_constructors_roundtrip() {
        assert_eq!(Value::int(7).as_int(), Some(7));
        assert_eq!(Value::float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::bool(true).as_bool(), Some(true));
        assert!(Value::null().is_null());
    }

    #[test]
    fn priority_clamped_to_max() {
        let v = Value::int(1);
        v.set_priority(200);
        assert_eq!(v.priority(), MAX_PRIORITY);
    }

    #[test]
    fn chain_append_and_iterate() {
        let head = Value::int(1);
        head.chain_append(Value::int(2));
        head.chain_append(Value::int(3));
        let values: Vec<_> = head.chain_iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(head.chain_len(), 3);
    }

    #[test]
    fn clone_shares_node() {
        let a = Value::int(1);
        let b = a.clone();
        b.set_priority(5);
        assert_eq!(a.priority(), 5);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn deep_eq_ignores_key_and_priority() {
        let a = Value::int(1);
        a.set_key(Bytes::owned(b"k".to_vec()), false);
        let b = Value::int(1);
        b.set_priority(3);
        assert!(a.deep_eq(&b));
    }

    #[test]
    fn merge_object_from_higher_priority_wins() {
        let mut base_map = ObjectMap::new(false);
        let base_child = Value::int(1);
        base_child.set_priority(0);
        base_map.insert_chained(b"x", base_child);
        let base = Value::object(base_map);

        let mut incoming_map = ObjectMap::new(false);
        let incoming_child = Value::int(2);
        incoming_child.set_priority(5);
        incoming_map.insert_chained(b"x", incoming_child);
        let incoming = Value::object(incoming_map);

        base.merge_object_from(&incoming);
        let data = base.borrow();
        if let Tag::Object(map) = &data.tag {
            assert_eq!(map.find(b"x").unwrap().as_int(), Some(2));
        } else {
            panic!("expected object");
        }
    }
}
