//! The sink receiving finished keys, and its in-memory implementation.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use tracing::trace;

use crate::{CommentEntry, Key, KeyName, KeyValue};

/// Destination of the keys built by a parse.
///
/// The parse only ever looks keys up and appends them; what the store does
/// with them beyond that is its own business.
pub trait KeySink {
    /// Find the key with exactly this name.
    fn lookup(&self, name: &KeyName) -> Option<&Key>;

    /// Find the key with exactly this name, for updating it in place.
    fn lookup_mut(&mut self, name: &KeyName) -> Option<&mut Key>;

    /// Insert `key`, replacing any key with the same name.
    fn append(&mut self, key: Key);
}

/// An ordered, in-memory set of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: BTreeMap<KeyName, Key>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Look a key up by its textual name.
    pub fn get(&self, name: &str) -> Option<&Key> {
        self.keys.get(&KeyName::parse(name))
    }

    /// Keys in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.values()
    }

    /// Keys carrying an order index, sorted by it.
    pub fn by_order(&self) -> Vec<&Key> {
        let mut ordered: Vec<&Key> = self.keys.values().filter(|k| k.order().is_some()).collect();
        ordered.sort_by_key(|k| k.order());
        ordered
    }

    /// Append every key of this set into `sink`.
    pub fn merge_into<S: KeySink + ?Sized>(self, sink: &mut S) {
        for (_, key) in self.keys {
            sink.append(key);
        }
    }

    /// Stable, line-oriented rendering of every key, attribute and comment.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for key in self.keys.values() {
            // writing to a String cannot fail
            let _ = write_key(&mut out, key);
        }
        out
    }
}

fn write_key(out: &mut String, key: &Key) -> fmt::Result {
    write!(out, "{}", key.name())?;
    match key.value() {
        Some(KeyValue::String(s)) => write!(out, " = {s:?}")?,
        Some(KeyValue::Binary(b)) => write!(out, " = <binary {} bytes>", b.len())?,
        None => {}
    }
    out.push('\n');
    if let Some(order) = key.order() {
        writeln!(out, "  order: {order}")?;
    }
    for (name, value) in key.meta_iter() {
        writeln!(out, "  {name}: {value:?}")?;
    }
    let comments = key.comments();
    for entry in &comments.leading {
        write_entry(out, "leading", entry)?;
    }
    if let Some(inline) = &comments.inline {
        writeln!(out, "  inline: {:?}", inline.text)?;
    }
    for entry in &comments.trailing {
        write_entry(out, "trailing", entry)?;
    }
    Ok(())
}

fn write_entry(out: &mut String, label: &str, entry: &CommentEntry) -> fmt::Result {
    match entry {
        CommentEntry::Text(comment) => writeln!(out, "  {label}: {:?}", comment.text),
        CommentEntry::BlankLines(n) => writeln!(out, "  {label}: <{n} blank>"),
    }
}

impl KeySink for KeySet {
    fn lookup(&self, name: &KeyName) -> Option<&Key> {
        self.keys.get(name)
    }

    fn lookup_mut(&mut self, name: &KeyName) -> Option<&mut Key> {
        self.keys.get_mut(name)
    }

    fn append(&mut self, key: Key) {
        trace!(name = %key.name(), "append");
        self.keys.insert(key.name().clone(), key);
    }
}

impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl<'a> IntoIterator for &'a KeySet {
    type Item = &'a Key;
    type IntoIter = std::collections::btree_map::Values<'a, KeyName, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.values()
    }
}
