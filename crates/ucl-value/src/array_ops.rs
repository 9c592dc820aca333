//! Array-shaped convenience operations (`array_append`,
//! `array_prepend`, ...). These operate on the `Vec<Value>` stored inside a
//! `Tag::Array` node; callers are expected to have already confirmed the
//! node is an array (e.g. via `Value::is_array`).

use crate::value::{Tag, Value};

fn with_array<T>(node: &Value, f: impl FnOnce(&mut Vec<Value>) -> T) -> Option<T> {
    let mut data = node.borrow_mut();
    match &mut data.tag {
        Tag::Array(items) => Some(f(items)),
        _ => None,
    }
}

pub fn append(node: &Value, value: Value) -> bool {
    with_array(node, |items| items.push(value)).is_some()
}

pub fn prepend(node: &Value, value: Value) -> bool {
    with_array(node, |items| items.insert(0, value)).is_some()
}

pub fn head(node: &Value) -> Option<Value> {
    with_array(node, |items| items.first().cloned())?
}

pub fn tail(node: &Value) -> Option<Value> {
    with_array(node, |items| items.last().cloned())?
}

pub fn pop_first(node: &Value) -> Option<Value> {
    with_array(node, |items| {
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    })?
}

pub fn pop_last(node: &Value) -> Option<Value> {
    with_array(node, |items| items.pop())?
}

pub fn find_index(node: &Value, predicate: impl Fn(&Value) -> bool) -> Option<usize> {
    with_array(node, |items| items.iter().position(|v| predicate(v)))?
}

pub fn delete(node: &Value, index: usize) -> Option<Value> {
    with_array(node, |items| {
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    })?
}

pub fn sort(node: &Value, compare: impl Fn(&Value, &Value) -> std::cmp::Ordering) -> bool {
    with_array(node, |items| items.sort_by(compare)).is_some()
}
