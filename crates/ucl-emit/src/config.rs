//! The library's native "config" output format.
//!
//! `key = value;` for scalars, `key { ... }` for objects (no `=`), `key
//! [ ... ]` for an explicit array, and a repeated `key = value;` line per
//! element of an implicit array.

use crate::common::{chain_members, escape_json_string, format_float, is_bare_key};
use ucl_value::{ObjectMap, Tag, Value};

const INDENT_WIDTH: usize = 4;

pub fn to_config(value: &Value) -> String {
    let mut out = String::new();
    let data = value.borrow();
    match &data.tag {
        // The common case: an unbracketed top-level object emits its
        // members directly, with no enclosing braces.
        Tag::Object(map) => write_members(map, &mut out, 0),
        _ => write_scalar_or_container(value, &mut out, 0),
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth * INDENT_WIDTH {
        out.push(' ');
    }
}

fn write_key(key: &[u8], out: &mut String) {
    if is_bare_key(key) {
        out.push_str(&String::from_utf8_lossy(key));
    } else {
        out.push_str(&escape_json_string(key));
    }
}

fn write_members(map: &ObjectMap, out: &mut String, depth: usize) {
    for (key, head) in map.iter() {
        let members = chain_members(head);
        if members.len() > 1 {
            for member in &members {
                indent(out, depth);
                write_key(key.as_slice(), out);
                write_bound_value(member, out, depth);
                out.push('\n');
            }
        } else {
            indent(out, depth);
            write_key(key.as_slice(), out);
            write_bound_value(head, out, depth);
            out.push('\n');
        }
    }
}

/// Writes the `= value;` / ` { ... }` / ` [ ... ]` tail that follows a key.
fn write_bound_value(value: &Value, out: &mut String, depth: usize) {
    let is_object = value.is_object();
    if !is_object {
        out.push_str(" = ");
    } else {
        out.push(' ');
    }
    write_scalar_or_container(value, out, depth);
    if !is_object {
        out.push(';');
    }
}

fn write_scalar_or_container(value: &Value, out: &mut String, depth: usize) {
    let data = value.borrow();
    match &data.tag {
        Tag::Null => out.push_str("null"),
        Tag::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Tag::Int(i) => out.push_str(&i.to_string()),
        Tag::Float(f) => out.push_str(&format_float(*f)),
        Tag::Time(t) => out.push_str(&format_float(*t)),
        Tag::String(bytes) => out.push_str(&escape_json_string(bytes.as_slice())),
        Tag::Array(items) => write_array(items, out, depth),
        Tag::Object(map) => write_object(map, out, depth),
        Tag::UserData(_) => out.push_str("null"),
    }
}

fn write_array(items: &[Value], out: &mut String, depth: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push_str("[\n");
    for item in items {
        indent(out, depth + 1);
        write_scalar_or_container(item, out, depth + 1);
        out.push_str(";\n");
    }
    indent(out, depth);
    out.push(']');
}

fn write_object(map: &ObjectMap, out: &mut String, depth: usize) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    write_members(map, out, depth + 1);
    indent(out, depth);
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucl_value::Bytes;

    #[test]
    fn scalar_member_uses_equals_and_semicolon() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"port", Value::int(80));
        let out = to_config(&Value::object(map));
        assert_eq!(out.trim(), "port = 80;");
    }

    #[test]
    fn nested_object_omits_equals() {
        let mut inner = ObjectMap::new(false);
        inner.insert_chained(b"port", Value::int(80));
        let mut outer = ObjectMap::new(false);
        outer.insert_chained(b"server", Value::object(inner));
        let out = to_config(&Value::object(outer));
        assert!(out.contains("server {\n"));
        assert!(!out.contains("server ="));
    }

    #[test]
    fn repeated_key_becomes_repeated_lines() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"worker", Value::string(Bytes::owned(b"a".to_vec())));
        map.insert_chained(b"worker", Value::string(Bytes::owned(b"b".to_vec())));
        let out = to_config(&Value::object(map));
        let lines: Vec<_> = out.lines().filter(|l| l.contains("worker")).collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn key_needing_escape_is_quoted() {
        let mut map = ObjectMap::new(false);
        map.insert_chained(b"has space", Value::int(1));
        let out = to_config(&Value::object(map));
        assert!(out.contains("\"has space\""));
    }
}
