//! Tree iteration (`iterate`).
//!
//! Objects hold one `Value` per key in `ObjectMap`, but a key with repeated
//! insertions is really a sibling chain. `expand` controls whether
//! iterating an object walks each key's full chain (`true`, the "implicit
//! array" view) or stops at the chain head (`false`, treating each key
//! exactly once regardless of how many times it was set).

use crate::value::{Tag, Value};

/// Yields the children of `node` according to `expand`.
///
/// - Arrays always yield their elements in order; `expand` has no effect.
/// - Objects yield each key's chain head when `expand` is `false`, or every
///   value in every key's sibling chain, in key order, when `true`.
/// - Any other tag yields nothing (scalars have no children).
pub fn iterate(node: &Value, expand: bool) -> Vec<Value> {
    let data = node.borrow();
    match &data.tag {
        Tag::Array(items) => items.clone(),
        Tag::Object(map) => {
            if expand {
                map.iter()
                    .flat_map(|(_, head)| head.chain_iter())
                    .collect()
            } else {
                map.iter().map(|(_, head)| head.clone()).collect()
            }
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectMap;

    #[test]
    fn array_iteration_ignores_expand() {
        let arr = Value::array(vec![Value::int(1), Value::int(2)]);
        assert_eq!(iterate(&arr, false).len(), 2);
        assert_eq!(iterate(&arr, true).len(), 2);
    }

    #[test]
    fn object_without_expand_yields_one_per_key() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"k", Value::int(1));
        map.insert_chained(b"k", Value::int(2));
        map.insert_chained(b"other", Value::int(3));
        let obj = Value::object(map);
        assert_eq!(iterate(&obj, false).len(), 2);
    }

    #[test]
    fn object_with_expand_walks_full_chains() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"k", Value::int(1));
        map.insert_chained(b"k", Value::int(2));
        map.insert_chained(b"other", Value::int(3));
        let obj = Value::object(map);
        let values = iterate(&obj, true);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn scalar_has_no_children() {
        assert!(iterate(&Value::int(1), true).is_empty());
    }
}
