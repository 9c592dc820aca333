//! The value tree: the in-memory representation every parsed document,
//! schema, and emitted output is built from.
//!
//! A document is a DAG of [`Value`] nodes, each a cheap, reference-counted
//! handle (`Rc<RefCell<_>>`) so the tree can be restructured in place during
//! parsing (macro expansion, key merging) without a borrow checker fight at
//! every call site. Strings are [`Bytes`], explicitly either borrowed from
//! the parser's input or owned, so a read-only tree can stay zero-copy.
//! Objects are [`object::ObjectMap`], an order-preserving, optionally
//! case-folding map; repeated keys chain onto the first value's sibling
//! link rather than overwriting it, exposed through [`iter::iterate`]
//! and [`path::lookup_path`].

pub mod array_ops;
pub mod bytes;
pub mod iter;
pub mod object;
pub mod path;
pub mod userdata;
pub mod value;

pub use bytes::Bytes;
pub use iter::iterate;
pub use object::ObjectMap;
pub use path::lookup_path;
pub use userdata::UserData;
pub use value::{Tag, Value, ValueFlags, MAX_PRIORITY};
