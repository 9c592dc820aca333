//! Shared formatting helpers used by every emitter.
//!
//! Mirrors the shape of `ucl_emitter_utils.c`'s `ucl_elt_string_write_json`:
//! scan the byte string once, escaping only the bytes that need it instead
//! of allocating per-character.

use ucl_lex::charclass::{test_character, CharClass};
use ucl_value::Value;

/// Collects a key's same-key sibling chain into a flat list.
/// A single-element chain is the common case; more than one element means
/// the document repeated the key, which every emitter renders as an
/// implicit array.
pub fn chain_members(head: &Value) -> Vec<Value> {
    head.chain_iter().collect()
}

/// Renders a float so it round-trips; an integral float still gets a `.0`
/// so it stays distinguishable from an integer on re-read.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{f}");
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

/// JSON string escaping, shared by the JSON emitters and (for scalar
/// values) the config emitter.
pub fn escape_json_string(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'"');
    for &b in bytes {
        if test_character(b, CharClass::JSON_UNSAFE) {
            match b {
                b'\n' => out.extend_from_slice(b"\\n"),
                b'\r' => out.extend_from_slice(b"\\r"),
                0x08 => out.extend_from_slice(b"\\b"),
                b'\t' => out.extend_from_slice(b"\\t"),
                0x0c => out.extend_from_slice(b"\\f"),
                b'\\' => out.extend_from_slice(b"\\\\"),
                b'"' => out.extend_from_slice(b"\\\""),
                other => out.extend_from_slice(format!("\\u{:04x}", other).as_bytes()),
            }
        } else {
            out.push(b);
        }
    }
    out.push(b'"');
    String::from_utf8_lossy(&out).into_owned()
}

/// A key is emitted bare in the config format when every byte belongs to
/// the key-class table.
pub fn is_bare_key(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && test_character(bytes[0], CharClass::KEY_START)
        && bytes[1..].iter().all(|&b| test_character(b, CharClass::KEY_BODY))
}

/// A string is YAML-unsafe (needs quoting) if it's empty, looks like
/// another scalar type, starts with a YAML indicator character, or
/// contains bytes that would change the parse (colon-space, `#`, or
/// control characters).
pub fn needs_yaml_quote(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    let text = String::from_utf8_lossy(bytes);
    if matches!(text.as_ref(), "true" | "false" | "null" | "~" | "yes" | "no") {
        return true;
    }
    if text.parse::<f64>().is_ok() {
        return true;
    }
    let first = bytes[0];
    if matches!(
        first,
        b'-' | b'?' | b':' | b',' | b'[' | b']' | b'{' | b'}' | b'#' | b'&' | b'*' | b'!'
            | b'|' | b'>' | b'\'' | b'"' | b'%' | b'@' | b'`' | b' '
    ) {
        return true;
    }
    if bytes.last() == Some(&b' ') {
        return true;
    }
    if text.contains(": ") || text.contains(" #") || text.contains('\n') || text.contains('\t') {
        return true;
    }
    bytes.iter().any(|&b| b < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_float_gets_dot_zero() {
        assert_eq!(format_float(3.0), "3.0");
    }

    #[test]
    fn fractional_float_is_unchanged_shape() {
        assert_eq!(format_float(3.5), "3.5");
    }

    #[test]
    fn json_escape_quotes_and_escapes_control_bytes() {
        assert_eq!(escape_json_string(b"a\nb"), "\"a\\nb\"");
        assert_eq!(escape_json_string(b"plain"), "\"plain\"");
    }

    #[test]
    fn json_escape_passes_multibyte_utf8_through_unmangled() {
        assert_eq!(escape_json_string("café".as_bytes()), "\"café\"");
    }

    #[test]
    fn bare_key_detection() {
        assert!(is_bare_key(b"server_name"));
        assert!(!is_bare_key(b"has space"));
        assert!(!is_bare_key(b"1starts-with-digit"));
        assert!(!is_bare_key(b""));
    }

    #[test]
    fn yaml_quoting_rules() {
        assert!(needs_yaml_quote(b""));
        assert!(needs_yaml_quote(b"true"));
        assert!(needs_yaml_quote(b"42"));
        assert!(needs_yaml_quote(b"- leading dash"));
        assert!(!needs_yaml_quote(b"plain-value"));
    }
}
