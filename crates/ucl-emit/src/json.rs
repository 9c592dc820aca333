//! JSON and compact-JSON emission.

use crate::common::{chain_members, escape_json_string, format_float};
use ucl_value::{Tag, Value};

const INDENT_WIDTH: usize = 4;

/// Pretty JSON: four-space indent, a newline after every `{ [ , :`.
pub fn to_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out, 0, true);
    out
}

/// The same semantics with no inserted whitespace.
pub fn to_json_compact(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out, 0, false);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth * INDENT_WIDTH {
        out.push(' ');
    }
}

fn write_value(value: &Value, out: &mut String, depth: usize, pretty: bool) {
    let data = value.borrow();
    match &data.tag {
        Tag::Null => out.push_str("null"),
        Tag::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Tag::Int(i) => out.push_str(&i.to_string()),
        Tag::Float(f) => out.push_str(&format_float(*f)),
        Tag::Time(t) => out.push_str(&format_float(*t)),
        Tag::String(bytes) => out.push_str(&escape_json_string(bytes.as_slice())),
        Tag::Array(items) => write_array(items, out, depth, pretty),
        Tag::Object(map) => write_object(map, out, depth, pretty),
        // No JSON representation for an opaque host payload; emitted as null
        // the way a value with no serialisable form would be.
        Tag::UserData(_) => out.push_str("null"),
    }
}

fn write_array(items: &[Value], out: &mut String, depth: usize, pretty: bool) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push('[');
    if pretty {
        out.push('\n');
    }
    for (i, item) in items.iter().enumerate() {
        if pretty {
            indent(out, depth + 1);
        }
        write_value(item, out, depth + 1, pretty);
        if i + 1 < items.len() {
            out.push(',');
        }
        if pretty {
            out.push('\n');
        }
    }
    if pretty {
        indent(out, depth);
    }
    out.push(']');
}

fn write_object(map: &ucl_value::ObjectMap, out: &mut String, depth: usize, pretty: bool) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    if pretty {
        out.push('\n');
    }
    let len = map.len();
    for (i, (key, head)) in map.iter().enumerate() {
        if pretty {
            indent(out, depth + 1);
        }
        out.push_str(&escape_json_string(key.as_slice()));
        out.push(':');
        if pretty {
            out.push(' ');
        }
        let members = chain_members(head);
        if members.len() > 1 {
            write_array(&members, out, depth + 1, pretty);
        } else {
            write_value(head, out, depth + 1, pretty);
        }
        if i + 1 < len {
            out.push(',');
        }
        if pretty {
            out.push('\n');
        }
    }
    if pretty {
        indent(out, depth);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucl_value::{Bytes, ObjectMap};

    fn sample() -> Value {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"name", Value::string(Bytes::owned(b"redis".to_vec())));
        map.insert_chained(b"port", Value::int(6379));
        map.insert_chained(b"worker", Value::string(Bytes::owned(b"a".to_vec())));
        map.insert_chained(b"worker", Value::string(Bytes::owned(b"b".to_vec())));
        Value::object(map)
    }

    #[test]
    fn compact_json_has_no_whitespace() {
        let out = to_json_compact(&sample());
        assert!(!out.contains('\n'));
        assert!(out.contains("\"name\":\"redis\""));
    }

    #[test]
    fn pretty_json_indents_with_four_spaces() {
        let out = to_json(&sample());
        assert!(out.contains("\n    \"name\""));
    }

    #[test]
    fn repeated_keys_flatten_into_an_array() {
        let out = to_json_compact(&sample());
        assert!(out.contains("\"worker\":[\"a\",\"b\"]"));
    }

    #[test]
    fn integral_float_emits_with_dot_zero() {
        let out = to_json_compact(&Value::float(4.0));
        assert_eq!(out, "4.0");
    }

    #[test]
    fn empty_containers_render_compactly() {
        assert_eq!(to_json(&Value::array(vec![])), "[]");
        assert_eq!(to_json(&Value::object(ObjectMap::new(false))), "{}");
    }
}
