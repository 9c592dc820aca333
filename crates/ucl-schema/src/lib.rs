//! The combinator-complete schema validator.
//!
//! A schema is itself a value tree (normally an object); [`validate`] walks
//! it against a candidate value and returns the first constraint that
//! failed. Validation never panics and is non-fatal to the caller — a
//! `false`/`Err` result is an ordinary value, not a library bug.

pub mod validate;

pub use validate::validate;
