#![doc = include_str!("../README.md")]

use tomlkeys_driver::{Callback, Error, Event, Grammar, drive};
use tomlkeys_scalar::{Location, Scalar, ScalarKind};

/// A (possibly dotted) key: one scalar per segment.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPath(pub Vec<Scalar>);

impl From<&str> for KeyPath {
    /// `a.b.c` as three bare segments.
    fn from(dotted: &str) -> Self {
        KeyPath(
            dotted
                .split('.')
                .map(|segment| Scalar::verbatim(ScalarKind::Bare, segment))
                .collect(),
        )
    }
}

impl From<Scalar> for KeyPath {
    fn from(scalar: Scalar) -> Self {
        KeyPath(vec![scalar])
    }
}

impl From<Vec<Scalar>> for KeyPath {
    fn from(segments: Vec<Scalar>) -> Self {
        KeyPath(segments)
    }
}

/// Something inside an array value.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Value(Val),
    Comment(String),
    BlankLine,
}

/// A value on the right of `=`.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Scalar(Scalar),
    Array(Vec<Item>),
    Inline(Vec<(KeyPath, Val)>),
}

impl Val {
    pub fn scalar(kind: ScalarKind, text: &str) -> Self {
        Val::Scalar(Scalar::verbatim(kind, text))
    }

    pub fn basic(text: &str) -> Self {
        Self::scalar(ScalarKind::Basic, text)
    }

    pub fn literal(text: &str) -> Self {
        Self::scalar(ScalarKind::Literal, text)
    }

    pub fn bare(text: &str) -> Self {
        Self::scalar(ScalarKind::Bare, text)
    }

    pub fn int(text: &str) -> Self {
        Self::scalar(ScalarKind::Decimal, text)
    }

    pub fn hex(text: &str) -> Self {
        Self::scalar(ScalarKind::Hex, text)
    }

    pub fn float(text: &str) -> Self {
        Self::scalar(ScalarKind::Float, text)
    }

    pub fn boolean(value: bool) -> Self {
        Self::scalar(ScalarKind::Boolean, if value { "true" } else { "false" })
    }

    /// An array of plain values.
    pub fn array(values: Vec<Val>) -> Self {
        Val::Array(values.into_iter().map(Item::Value).collect())
    }

    pub fn inline<K: Into<KeyPath>>(pairs: Vec<(K, Val)>) -> Self {
        Val::Inline(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Builder for the event sequence of one document.
///
/// Each top-level call describes one source line; scalars are placed on it.
#[derive(Debug, Clone)]
pub struct Script {
    events: Vec<Event>,
    line: u32,
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl Script {
    pub fn new() -> Self {
        Self {
            events: vec![Event::EnterDocument],
            line: 0,
        }
    }

    /// `key = value`
    pub fn pair(mut self, key: impl Into<KeyPath>, value: Val) -> Self {
        self.next_line();
        self.push_pair(key.into(), value);
        self
    }

    /// `key = value # comment`
    pub fn pair_with_comment(mut self, key: impl Into<KeyPath>, value: Val, comment: &str) -> Self {
        self.next_line();
        self.push_pair(key.into(), value);
        self.push_comment(comment);
        self.events.push(Event::ExitInlineCommentAfterPair);
        self
    }

    /// `[key]`
    pub fn table(mut self, key: impl Into<KeyPath>) -> Self {
        self.next_line();
        self.push_header(key.into(), Event::EnterSimpleTable, Event::ExitSimpleTable);
        self
    }

    /// `[key] # comment`
    pub fn table_with_comment(mut self, key: impl Into<KeyPath>, comment: &str) -> Self {
        self.next_line();
        self.push_header(key.into(), Event::EnterSimpleTable, Event::ExitSimpleTable);
        self.push_comment(comment);
        self.events.push(Event::ExitInlineCommentAfterTable);
        self
    }

    /// `[[key]]`
    pub fn table_array(mut self, key: impl Into<KeyPath>) -> Self {
        self.next_line();
        self.push_header(key.into(), Event::EnterTableArray, Event::ExitTableArray);
        self
    }

    /// `[[key]] # comment`
    pub fn table_array_with_comment(mut self, key: impl Into<KeyPath>, comment: &str) -> Self {
        self.next_line();
        self.push_header(key.into(), Event::EnterTableArray, Event::ExitTableArray);
        self.push_comment(comment);
        self.events.push(Event::ExitInlineCommentAfterTable);
        self
    }

    /// `#comment` on a line of its own; `text` is what follows the `#`.
    pub fn comment(mut self, text: &str) -> Self {
        self.next_line();
        self.push_comment(text);
        self
    }

    pub fn blank_line(mut self) -> Self {
        self.next_line();
        self.events.push(Event::Newline);
        self
    }

    /// An arbitrary event, e.g. a syntax error.
    pub fn raw(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Current line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The finished sequence, closed with `ExitDocument`.
    pub fn events(mut self) -> Vec<Event> {
        self.events.push(Event::ExitDocument);
        self.events
    }

    fn next_line(&mut self) {
        self.line += 1;
    }

    fn scalar(&self, scalar: Scalar) -> Scalar {
        scalar.at_line(self.line)
    }

    fn push_comment(&mut self, text: &str) {
        let location = Location::at_line(self.line);
        self.events.push(Event::Comment(Scalar::new(
            ScalarKind::Comment,
            text,
            format!("#{text}"),
            location,
        )));
    }

    fn push_key(&mut self, key: KeyPath) {
        self.events.push(Event::EnterKey);
        for segment in key.0 {
            let segment = self.scalar(segment);
            self.events.push(Event::SimpleKey(segment));
        }
        self.events.push(Event::ExitKey);
    }

    fn push_header(&mut self, key: KeyPath, enter: Event, exit: Event) {
        self.events.push(enter);
        self.push_key(key);
        self.events.push(exit);
    }

    fn push_pair(&mut self, key: KeyPath, value: Val) {
        self.push_key(key);
        self.push_value(value);
        self.events.push(Event::ExitKeyValue);
    }

    fn push_value(&mut self, value: Val) {
        match value {
            Val::Scalar(scalar) => {
                let scalar = self.scalar(scalar);
                self.events.push(Event::Value(scalar));
            }
            Val::Array(items) if items.is_empty() => self.events.push(Event::EmptyArray),
            Val::Array(items) => {
                self.events.push(Event::EnterArray);
                for item in items {
                    match item {
                        Item::Value(value) => {
                            self.events.push(Event::EnterArrayElement);
                            self.push_value(value);
                            self.events.push(Event::ExitArrayElement);
                        }
                        Item::Comment(text) => self.push_comment(&text),
                        Item::BlankLine => self.events.push(Event::Newline),
                    }
                }
                self.events.push(Event::ExitArray);
            }
            Val::Inline(pairs) if pairs.is_empty() => self.events.push(Event::EmptyInlineTable),
            Val::Inline(pairs) => {
                self.events.push(Event::EnterInlineTable);
                for (key, value) in pairs {
                    self.push_pair(key, value);
                }
                self.events.push(Event::ExitInlineTable);
            }
        }
    }
}

/// A grammar that ignores its source and reports a fixed event list.
#[derive(Debug, Clone)]
pub struct Replay {
    events: Vec<Event>,
}

impl Replay {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl Grammar for Replay {
    fn parse(&mut self, _source: &str, callback: &mut dyn Callback) -> Result<(), Error> {
        drive(self.events.iter().cloned(), callback)
    }
}
