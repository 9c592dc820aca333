//! `${NAME}` variable substitution.
//!
//! Expansion only happens inside a macro's string argument — a general
//! value like `path = "${HOME}/x";` is left untouched, matching the
//! original's scoping of variable expansion to include directives. `FILENAME`
//! and `CURDIR` are populated automatically from `Parser::add_file`/
//! `set_filevars`; anything else falls back to the registered table, then
//! the optional host handler, then is left unexpanded if nobody claims it.

use ucl_value::Bytes;

/// Scans `input` for `${NAME}` runs and replaces each with `lookup`'s
/// answer. An unterminated `${` (no closing `}`) is left as literal text,
/// same as an unknown name.
pub fn expand(input: &[u8], mut lookup: impl FnMut(&[u8]) -> Option<Bytes>) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'$' && input.get(i + 1) == Some(&b'{') {
            if let Some(rel_end) = input[i + 2..].iter().position(|&b| b == b'}') {
                let name = &input[i + 2..i + 2 + rel_end];
                match lookup(name) {
                    Some(value) => out.extend_from_slice(value.as_slice()),
                    None => out.extend_from_slice(&input[i..i + 2 + rel_end + 1]),
                }
                i += 2 + rel_end + 1;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}
