//! YAML emission: a flow/block hybrid.
//!
//! Block mappings and sequences throughout; scalars are unquoted unless
//! the YAML-unsafe class applies, in which case they fall back to the
//! same quoted-and-escaped form the JSON emitter uses.

use crate::common::{chain_members, escape_json_string, format_float, needs_yaml_quote};
use ucl_value::{ObjectMap, Tag, Value};

const INDENT_WIDTH: usize = 2;

pub fn to_yaml(value: &Value) -> String {
    let mut out = String::new();
    let data = value.borrow();
    match &data.tag {
        Tag::Object(map) if !map.is_empty() => write_members(map, &mut out, 0),
        Tag::Array(items) if !items.is_empty() => write_sequence(items, &mut out, 0),
        _ => {
            write_scalar(value, &mut out);
            out.push('\n');
        }
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth * INDENT_WIDTH {
        out.push(' ');
    }
}

fn write_scalar(value: &Value, out: &mut String) {
    let data = value.borrow();
    match &data.tag {
        Tag::Null => out.push_str("null"),
        Tag::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Tag::Int(i) => out.push_str(&i.to_string()),
        Tag::Float(f) => out.push_str(&format_float(*f)),
        Tag::Time(t) => out.push_str(&format_float(*t)),
        Tag::String(bytes) => {
            if needs_yaml_quote(bytes.as_slice()) {
                out.push_str(&escape_json_string(bytes.as_slice()));
            } else {
                out.push_str(&bytes.as_str());
            }
        }
        Tag::Array(_) | Tag::Object(_) | Tag::UserData(_) => out.push_str("null"),
    }
}

fn is_block(value: &Value) -> bool {
    let data = value.borrow();
    match &data.tag {
        Tag::Object(map) => !map.is_empty(),
        Tag::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn write_members(map: &ObjectMap, out: &mut String, depth: usize) {
    for (key, head) in map.iter() {
        let members = chain_members(head);
        indent(out, depth);
        if needs_yaml_quote(key.as_slice()) {
            out.push_str(&escape_json_string(key.as_slice()));
        } else {
            out.push_str(&key.as_str());
        }
        out.push(':');
        if members.len() > 1 {
            out.push('\n');
            write_sequence(&members, out, depth + 1);
        } else if is_block(head) {
            out.push('\n');
            write_node(head, out, depth + 1);
        } else {
            out.push(' ');
            write_scalar(head, out);
            out.push('\n');
        }
    }
}

fn write_sequence(items: &[Value], out: &mut String, depth: usize) {
    for item in items {
        indent(out, depth);
        out.push_str("- ");
        if is_block(item) {
            out.push('\n');
            write_node(item, out, depth + 1);
        } else {
            write_scalar(item, out);
            out.push('\n');
        }
    }
}

fn write_node(value: &Value, out: &mut String, depth: usize) {
    let data = value.borrow();
    match &data.tag {
        Tag::Object(map) => write_members(map, out, depth),
        Tag::Array(items) => write_sequence(items, out, depth),
        _ => {
            indent(out, depth);
            write_scalar(value, out);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucl_value::Bytes;

    #[test]
    fn scalar_members_are_unquoted_when_safe() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"name", Value::string(Bytes::owned(b"redis".to_vec())));
        let out = to_yaml(&Value::object(map));
        assert_eq!(out, "name: redis\n");
    }

    #[test]
    fn unsafe_string_is_quoted() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"flag", Value::string(Bytes::owned(b"true".to_vec())));
        let out = to_yaml(&Value::object(map));
        assert_eq!(out, "flag: \"true\"\n");
    }

    #[test]
    fn nested_object_indents_as_a_block_mapping() {
        let mut inner = ObjectMap::new(false);
        inner.insert_chained(b"port", Value::int(80));
        let mut outer = ObjectMap::new(false);
        outer.insert_chained(b"server", Value::object(inner));
        let out = to_yaml(&Value::object(outer));
        assert_eq!(out, "server:\n  port: 80\n");
    }

    #[test]
    fn repeated_key_becomes_a_block_sequence() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"worker", Value::int(1));
        map.insert_chained(b"worker", Value::int(2));
        let out = to_yaml(&Value::object(map));
        assert_eq!(out, "worker:\n  - 1\n  - 2\n");
    }
}
