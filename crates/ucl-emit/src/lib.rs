//! Four pure-function output formats for a value tree.
//!
//! Each emitter is a `Fn(&Value) -> String` with no side state — they
//! never borrow from a parser and never allocate more than the output
//! itself requires beyond transient `Vec`s for sibling chains.

pub mod common;
pub mod config;
pub mod json;
pub mod yaml;

pub use config::to_config;
pub use json::{to_json, to_json_compact};
pub use yaml::to_yaml;
