//! Dot-separated path lookup (`lookup_path`).
//!
//! A path like `"a.b.0.c"` walks object keys by name and array elements by
//! decimal index, stopping as soon as a segment can't be resolved against
//! the current node's shape.

use crate::value::{Tag, Value};

/// Resolves a dot-separated path against `root`, returning the first
/// matching value's chain head (siblings are not followed further).
pub fn lookup_path(root: &Value, path: &str) -> Option<Value> {
    let mut current = root.clone();
    if path.is_empty() {
        return Some(current);
    }
    for segment in path.split('.') {
        current = lookup_segment(&current, segment)?;
    }
    Some(current)
}

fn lookup_segment(node: &Value, segment: &str) -> Option<Value> {
    let data = node.borrow();
    match &data.tag {
        Tag::Object(map) => map.find(segment.as_bytes()).cloned(),
        Tag::Array(items) => {
            let index: usize = segment.parse().ok()?;
            items.get(index).cloned()
        }
        _ => None,
    }
}
