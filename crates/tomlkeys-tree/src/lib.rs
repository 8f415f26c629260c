#![doc = include_str!("../README.md")]
//! Key tree representation for parsed TOML documents.
//!
//! A parse produces one [`Key`] per addressable location of the document:
//! values, tables, array containers and their elements. Keys are named by
//! slash-separated [`KeyName`]s below a root, e.g. `user:/app/server/port`
//! or `user:/app/fruit/#1/name` for the second element of a table array.

mod comment;
mod key;
mod keyset;
mod name;

pub use comment::{Comment, CommentEntry, Comments};
pub use key::{Key, KeyValue, TomlType, ValueType, meta};
pub use keyset::{KeySet, KeySink};
pub use name::{KeyName, array_index, parse_array_index};
