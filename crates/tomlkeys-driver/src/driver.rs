//! The driver: turns grammar events into keys.

use tomlkeys_scalar::{
    Location, Scalar, ScalarKind, is_base64_string, is_null_string, is_valid_bare_string,
    is_valid_datetime,
};
use tomlkeys_tree::{Comment, Key, KeyName, KeySet, KeySink, TomlType, ValueType, array_index};
use tracing::{debug, trace, warn};

use crate::arena::{NodeArena, NodeId};
use crate::comments::CommentQueue;
use crate::cursor::CursorStack;
use crate::table_array::{Rebase, TableArrayStack};
use crate::{Callback, Error, Event, Options};

#[cfg(test)]
mod tests;

/// One open array value.
#[derive(Debug)]
struct ArrayLevel {
    /// Index the next element gets.
    next: usize,
    /// The array opened its own node on the cursor stack.
    own_frame: bool,
}

/// How a committed scalar is typed.
enum Typing {
    String(TomlType),
    Typed { ty: ValueType, keep_orig: bool },
    Untyped,
}

/// Builds keys from grammar events and hands them to a [`KeySink`].
///
/// Feed events with [`Driver::event`] in document order, then call
/// [`Driver::finish`]. The first error stops the parse: it is returned from
/// the event that caused it and again from `finish`, and every later event
/// is ignored.
pub struct Driver<S: KeySink = KeySet> {
    options: Options,
    sink: S,

    arena: NodeArena,
    cursor: CursorStack,
    table_arrays: TableArrayStack,
    arrays: Vec<ArrayLevel>,
    comments: CommentQueue,

    /// Key being assembled from simple keys.
    scratch: Option<Key>,
    /// Last finished pair or array element, for inline comments.
    prev: Option<NodeId>,
    /// Value waiting to be stored in the top node.
    pending: Option<Scalar>,

    order: u64,
    simple_table_active: bool,
    /// Queued comments go to the key being closed.
    drain_on_key_exit: bool,
    /// The key being assembled is a `[table]` header.
    table_header: bool,

    started: bool,
    location: Location,
    error: Option<Error>,
}

impl<S: KeySink> Driver<S> {
    /// Create a driver writing into `sink`.
    pub fn new(options: Options, sink: S) -> Self {
        let mut arena = NodeArena::new();
        // an allocation failure here is latched and reported by `finish`
        let (cursor, error) = match arena.insert(Key::new(options.root.clone())) {
            Ok(root) => (CursorStack::new(root), None),
            Err(err) => (CursorStack::empty(), Some(err)),
        };
        Self {
            options,
            sink,
            arena,
            cursor,
            table_arrays: TableArrayStack::new(),
            arrays: Vec::new(),
            comments: CommentQueue::new(),
            scratch: None,
            prev: None,
            pending: None,
            order: 0,
            simple_table_active: false,
            drain_on_key_exit: true,
            table_header: false,
            started: false,
            location: Location::default(),
            error,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The sink keys were handed to so far.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The latched error, if the parse failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Nodes currently held by the driver's stacks.
    pub fn live_nodes(&self) -> usize {
        self.arena.live()
    }

    /// Handle one grammar event.
    pub fn event(&mut self, event: Event) -> Result<(), Error> {
        if let Some(error) = &self.error {
            let line = event.scalar().map(Scalar::line);
            warn!(?line, %error, "event after error ignored");
            return Ok(());
        }
        trace!(?event, "event");
        let result = self.dispatch(event);
        if let Err(error) = result {
            let error = match error.location {
                Some(_) => error,
                None => error.at(self.location),
            };
            debug!(%error, "parse failed");
            self.error = Some(error.clone());
            return Err(error);
        }
        Ok(())
    }

    /// Release every node and return the sink, or the error that stopped
    /// the parse.
    pub fn finish(mut self) -> Result<S, Error> {
        self.teardown();
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(self.sink),
        }
    }

    fn teardown(&mut self) {
        self.set_prev(None);
        self.scratch = None;
        self.pending = None;
        self.cursor.unwind(&mut self.arena);
        self.table_arrays.clear();
        self.arrays.clear();
        self.comments.clear();
        debug_assert_eq!(self.arena.live(), 0, "nodes outlived the parse");
    }

    fn dispatch(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::EnterDocument => self.enter_document(),
            Event::ExitDocument => self.exit_document(),
            Event::EnterKey => self.enter_key(),
            Event::ExitKey => self.exit_key(),
            Event::SimpleKey(scalar) => self.simple_key(scalar),
            Event::ExitKeyValue => self.exit_key_value(),
            Event::ExitInlineCommentAfterPair => self.inline_comment_after_pair(),
            Event::ExitInlineCommentAfterTable => self.inline_comment_after_table(),
            Event::Value(scalar) => self.value(scalar),
            Event::EnterSimpleTable => self.enter_simple_table(),
            Event::ExitSimpleTable => self.exit_simple_table(),
            Event::EnterTableArray => self.enter_table_array(),
            Event::ExitTableArray => self.exit_table_array(),
            Event::EnterArray => self.enter_array(),
            Event::ExitArray => self.exit_array(),
            Event::EmptyArray => {
                self.enter_array()?;
                self.exit_array()
            }
            Event::EnterArrayElement => self.enter_array_element(),
            Event::ExitArrayElement => self.exit_array_element(),
            Event::EnterInlineTable | Event::EmptyInlineTable => self.enter_inline_table(),
            Event::ExitInlineTable => {
                self.pending = None;
                Ok(())
            }
            Event::Comment(scalar) => self.comment(scalar),
            Event::Newline => self.comments.newline(),
            Event::SyntaxError { message, location } => {
                self.location = location;
                Err(Error::syntactic(message))
            }
        }
    }

    fn enter_document(&mut self) -> Result<(), Error> {
        if self.started {
            return Err(Error::internal("Document entered twice"));
        }
        self.started = true;
        Ok(())
    }

    fn exit_document(&mut self) -> Result<(), Error> {
        if self.comments.is_empty() {
            return Ok(());
        }
        let entries = self.comments.drain()?;
        let root = &self.options.root;
        match self.sink.lookup_mut(root) {
            Some(key) => key.comments_mut().leading.extend(entries),
            None => {
                let mut key = Key::new(root.clone());
                key.comments_mut().leading = entries;
                self.sink.append(key);
            }
        }
        Ok(())
    }

    fn enter_key(&mut self) -> Result<(), Error> {
        self.scratch = Some(Key::new(self.key_base()?));
        Ok(())
    }

    /// Name a new key starts from: the insertion point, except for a
    /// `[table]` header inside table arrays, which is resolved from the root
    /// and placed when the key is complete.
    fn key_base(&self) -> Result<KeyName, Error> {
        if self.table_header && !self.table_arrays.is_empty() {
            Ok(self.options.root.clone())
        } else {
            self.top_name()
        }
    }

    fn simple_key(&mut self, scalar: Scalar) -> Result<(), Error> {
        self.location = scalar.location;
        let segments = key_segments(scalar)?;
        let scratch = self
            .scratch
            .as_mut()
            .ok_or_else(|| Error::internal("Wanted to extend current key, but current key is missing"))?;
        for segment in segments {
            scratch.name_mut().push(segment);
        }
        Ok(())
    }

    fn exit_key(&mut self) -> Result<(), Error> {
        let mut key = self
            .scratch
            .take()
            .ok_or_else(|| Error::internal("Wanted to close current key, but current key is missing"))?;
        if std::mem::take(&mut self.table_header) {
            match self.table_arrays.rebase(key.name(), &self.options.root)? {
                Rebase::Outside => {}
                Rebase::Inside(name) => *key.name_mut() = name,
                Rebase::ArrayItself => {
                    return Err(Error::semantic(format!(
                        "Malformed input: Table '{}' was already defined as table array",
                        key.name()
                    )));
                }
            }
        }
        if let Some(existing) = self.sink.lookup(key.name())
            && !existing.is_table_array()
            && *key.name() != self.options.root
        {
            return Err(Error::semantic(format!(
                "Malformed input: Multiple occurrences of keyname '{}', but keynames must be unique.",
                key.name()
            )));
        }
        let id = self.cursor.push_new(&mut self.arena, key)?;
        if self.drain_on_key_exit {
            self.drain_comments_to(id)?;
        }
        let order = self.next_order();
        self.update(id, |key| key.set_order(order))
    }

    fn exit_key_value(&mut self) -> Result<(), Error> {
        self.commit_pending()?;
        let top = self.cursor.top()?;
        self.set_prev(Some(top));
        self.cursor.pop(&mut self.arena)
    }

    fn inline_comment_after_pair(&mut self) -> Result<(), Error> {
        let Some(comment) = self.comments.take_single("keypair")? else {
            return Ok(());
        };
        let prev = self.prev.ok_or_else(|| {
            Error::internal("Wanted to assign inline comment to keypair, but keypair key is missing")
        })?;
        self.update(prev, |key| key.comments_mut().inline = Some(comment))
    }

    fn inline_comment_after_table(&mut self) -> Result<(), Error> {
        let Some(comment) = self.comments.take_single("table")? else {
            return Ok(());
        };
        let top = self.cursor.top()?;
        self.update(top, |key| key.comments_mut().inline = Some(comment))
    }

    fn value(&mut self, scalar: Scalar) -> Result<(), Error> {
        self.location = scalar.location;
        match scalar.kind {
            ScalarKind::Bare => {
                return Err(Error::semantic(
                    "Malformed input: Found a bare string value, which is not allowed. Consider adding quotations around the string.",
                ));
            }
            ScalarKind::OffsetDateTime
            | ScalarKind::LocalDateTime
            | ScalarKind::LocalDate
            | ScalarKind::LocalTime => {
                if !is_valid_datetime(scalar.kind, &scalar.text) {
                    return Err(Error::semantic(format!(
                        "Malformed input: Invalid datetime: '{}'",
                        scalar.orig
                    )));
                }
            }
            ScalarKind::Comment => {
                return Err(Error::internal("Found a comment where a value was expected"));
            }
            ScalarKind::Basic
            | ScalarKind::Literal
            | ScalarKind::MultilineBasic
            | ScalarKind::MultilineLiteral
            | ScalarKind::Boolean
            | ScalarKind::Decimal
            | ScalarKind::Binary
            | ScalarKind::Octal
            | ScalarKind::Hex
            | ScalarKind::Float
            | ScalarKind::Inf
            | ScalarKind::PosInf
            | ScalarKind::NegInf
            | ScalarKind::Nan
            | ScalarKind::PosNan
            | ScalarKind::NegNan => {}
        }
        self.pending = Some(scalar);
        Ok(())
    }

    fn enter_simple_table(&mut self) -> Result<(), Error> {
        if self.simple_table_active {
            self.cursor.pop(&mut self.arena)?;
        } else {
            self.simple_table_active = true;
        }
        self.table_header = true;
        self.scratch = Some(Key::new(self.key_base()?));
        Ok(())
    }

    fn exit_simple_table(&mut self) -> Result<(), Error> {
        let top = self.cursor.top()?;
        self.update(top, |key| key.set_toml_type(TomlType::SimpleTable))?;
        self.emit(top)
    }

    fn enter_table_array(&mut self) -> Result<(), Error> {
        if self.simple_table_active {
            self.cursor.pop(&mut self.arena)?;
            self.simple_table_active = false;
        }
        if !self.table_arrays.is_empty() {
            // the previous element
            self.cursor.pop(&mut self.arena)?;
        }
        self.scratch = Some(Key::new(self.options.root.clone()));
        self.drain_on_key_exit = false;
        Ok(())
    }

    fn exit_table_array(&mut self) -> Result<(), Error> {
        let name = self.top_name()?;
        if !name.is_below(&self.options.root) {
            return Err(Error::internal("Table array header without a name"));
        }
        self.table_arrays.open(&name, &self.options.root, &self.sink)?;
        debug_assert!(self.table_arrays.is_well_nested(&self.options.root));

        // the header key only carried the unindexed name
        self.cursor.pop(&mut self.arena)?;
        self.order = self.order.saturating_sub(1);

        let element = self.table_arrays.element_name(&self.options.root)?;
        let index = self.table_arrays.top().map_or(0, |frame| frame.index);
        let array_root = element
            .parent()
            .ok_or_else(|| Error::internal("Table array element has no parent"))?;
        match self.sink.lookup_mut(&array_root) {
            Some(existing) => existing.set_array_last(index),
            None => {
                let mut key = Key::new(array_root);
                key.set_toml_type(TomlType::TableArray);
                key.set_array_last(index);
                key.set_order(self.next_order());
                debug!(name = %key.name(), "table array root");
                self.sink.append(key);
            }
        }

        let id = self.cursor.push_new(&mut self.arena, Key::new(element))?;
        self.drain_comments_to(id)?;
        self.emit(id)?;
        self.drain_on_key_exit = true;
        Ok(())
    }

    fn enter_array(&mut self) -> Result<(), Error> {
        let mut top = self.cursor.top()?;
        let mut own_frame = false;
        let marker = self.node(top)?.array_marker().map(str::to_owned);
        match marker.as_deref() {
            None => {}
            Some("") => {
                return Err(Error::internal(
                    "Empty array marker on array entry, expected an element to be entered first",
                ));
            }
            Some(_) => {
                let mut key = Key::new(self.node(top)?.name().child(array_index(0)));
                key.set_order(self.next_order());
                top = self.cursor.push_new(&mut self.arena, key)?;
                own_frame = true;
            }
        }
        self.arrays
            .try_reserve(1)
            .map_err(|_| Error::memory("Out of memory while opening an array"))?;
        self.arrays.push(ArrayLevel { next: 0, own_frame });
        self.update(top, Key::mark_array)
    }

    fn exit_array(&mut self) -> Result<(), Error> {
        let has_elements = self
            .arrays
            .last()
            .ok_or_else(|| Error::internal("Wanted to close an array, but no array is open"))?
            .next
            > 0;
        if has_elements {
            self.reattach_first_comment()?;
        }
        let top = self.cursor.top()?;
        let trailing = self.comments.drain()?;
        if !trailing.is_empty() {
            self.update(top, |key| key.comments_mut().trailing.extend(trailing))?;
        }
        let level = self
            .arrays
            .pop()
            .ok_or_else(|| Error::internal("Wanted to close an array, but no array is open"))?;
        self.emit(top)?;
        if level.own_frame {
            self.cursor.pop(&mut self.arena)?;
        }
        Ok(())
    }

    fn enter_array_element(&mut self) -> Result<(), Error> {
        let index = self
            .arrays
            .last()
            .ok_or_else(|| Error::internal("Wanted to enter an array element, but no array is open"))?
            .next;
        if index >= self.options.max_array_elements {
            return Err(Error::semantic(format!(
                "Malformed input: Array exceeds the maximum of {} elements",
                self.options.max_array_elements
            )));
        }
        if index > 0 {
            self.reattach_first_comment()?;
        }
        let top = self.cursor.top()?;
        let name = self.node(top)?.name().child(array_index(index));
        self.update(top, |key| key.set_array_last(index))?;
        let id = self.cursor.push_new(&mut self.arena, Key::new(name))?;
        if let Some(level) = self.arrays.last_mut() {
            level.next += 1;
        }
        self.drain_comments_to(id)?;
        Ok(())
    }

    fn exit_array_element(&mut self) -> Result<(), Error> {
        self.commit_pending()?;
        let top = self.cursor.top()?;
        self.set_prev(Some(top));
        self.cursor.pop(&mut self.arena)
    }

    fn enter_inline_table(&mut self) -> Result<(), Error> {
        let top = self.cursor.top()?;
        self.update(top, |key| key.set_toml_type(TomlType::InlineTable))?;
        self.emit(top)
    }

    fn comment(&mut self, scalar: Scalar) -> Result<(), Error> {
        self.location = scalar.location;
        if scalar.kind != ScalarKind::Comment {
            return Err(Error::internal(format!(
                "Expected a comment, found {}",
                scalar.kind.describe()
            )));
        }
        self.comments.push(Comment::new(scalar.text, scalar.orig))
    }

    /// Store the pending value in the top node and hand it to the sink.
    fn commit_pending(&mut self) -> Result<(), Error> {
        let Some(scalar) = self.pending.take() else {
            return Ok(());
        };
        let canonical = scalar
            .translate()
            .map_err(|err| {
                Error::semantic(format!(
                    "Malformed input: Invalid {} '{}': {err}",
                    scalar.kind.describe(),
                    scalar.orig
                ))
            })?
            .into_owned();
        let typing = match scalar.kind {
            ScalarKind::Basic => Typing::String(TomlType::StringBasic),
            ScalarKind::Literal => Typing::String(TomlType::StringLiteral),
            ScalarKind::MultilineBasic => Typing::String(TomlType::StringMlBasic),
            ScalarKind::MultilineLiteral => Typing::String(TomlType::StringMlLiteral),
            ScalarKind::Boolean => Typing::Typed {
                ty: ValueType::Boolean,
                keep_orig: false,
            },
            ScalarKind::Decimal => Typing::Typed {
                ty: ValueType::LongLong,
                keep_orig: true,
            },
            ScalarKind::Binary | ScalarKind::Octal | ScalarKind::Hex => Typing::Typed {
                ty: ValueType::UnsignedLongLong,
                keep_orig: true,
            },
            ScalarKind::Float
            | ScalarKind::Inf
            | ScalarKind::PosInf
            | ScalarKind::NegInf
            | ScalarKind::Nan
            | ScalarKind::PosNan
            | ScalarKind::NegNan => Typing::Typed {
                ty: ValueType::Double,
                keep_orig: true,
            },
            ScalarKind::OffsetDateTime
            | ScalarKind::LocalDateTime
            | ScalarKind::LocalDate
            | ScalarKind::LocalTime => Typing::Untyped,
            ScalarKind::Bare | ScalarKind::Comment => {
                return Err(Error::internal(format!(
                    "Cannot store {} as a value",
                    scalar.kind.describe()
                )));
            }
        };
        let top = self.cursor.top()?;
        let orig = scalar.orig;
        self.update(top, |key| {
            key.set_string(canonical.as_str());
            match typing {
                Typing::String(toml_type) => {
                    if is_null_string(&canonical) {
                        key.set_binary(Vec::new());
                    } else if !is_base64_string(&canonical) {
                        if key.value_type() != Some(ValueType::Binary) && !canonical.is_empty() {
                            key.set_value_type(ValueType::String);
                        }
                        key.set_orig_value_if_different(&orig);
                    }
                    key.set_toml_type(toml_type);
                }
                Typing::Typed { ty, keep_orig } => {
                    key.set_value_type(ty);
                    if keep_orig {
                        key.set_orig_value_if_different(&orig);
                    }
                }
                Typing::Untyped => key.set_orig_value_if_different(&orig),
            }
        })?;
        self.emit(top)
    }

    /// Move all queued comments onto `id` as its leading block.
    fn drain_comments_to(&mut self, id: NodeId) -> Result<(), Error> {
        trace!(queued = self.comments.len(), "drain comments");
        let entries = self.comments.drain()?;
        if entries.is_empty() {
            return Ok(());
        }
        self.update(id, |key| key.comments_mut().leading.extend(entries))
    }

    /// A comment queued first, on the line of the previous element, is that
    /// element's inline comment.
    fn reattach_first_comment(&mut self) -> Result<(), Error> {
        let Some(prev) = self.prev else {
            return Ok(());
        };
        if let Some(comment) = self.comments.take_first_text() {
            self.update(prev, |key| key.comments_mut().inline = Some(comment))?;
        }
        Ok(())
    }

    fn set_prev(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.arena.retain(id);
        }
        if let Some(old) = std::mem::replace(&mut self.prev, id) {
            self.arena.release(old);
        }
    }

    fn next_order(&mut self) -> u64 {
        let order = self.order;
        self.order += 1;
        order
    }

    fn node(&self, id: NodeId) -> Result<&Key, Error> {
        self.arena
            .get(id)
            .map(|slot| &slot.key)
            .ok_or_else(|| Error::internal("Key was released while still in use"))
    }

    fn top_name(&self) -> Result<KeyName, Error> {
        Ok(self.node(self.cursor.top()?)?.name().clone())
    }

    /// Modify a node; a node the sink already holds is handed over again.
    fn update(&mut self, id: NodeId, f: impl FnOnce(&mut Key)) -> Result<(), Error> {
        let slot = self
            .arena
            .slot_mut(id)
            .ok_or_else(|| Error::internal("Key was released while still in use"))?;
        f(&mut slot.key);
        if slot.emitted {
            self.sink.append(slot.key.clone());
        }
        Ok(())
    }

    /// Hand a node to the sink.
    fn emit(&mut self, id: NodeId) -> Result<(), Error> {
        let slot = self
            .arena
            .slot_mut(id)
            .ok_or_else(|| Error::internal("Key was released while still in use"))?;
        slot.emitted = true;
        debug!(name = %slot.key.name(), "emit");
        self.sink.append(slot.key.clone());
        Ok(())
    }
}

impl<S: KeySink> Callback for Driver<S> {
    fn event(&mut self, event: Event) -> Result<(), Error> {
        Driver::event(self, event)
    }
}

/// The name segments a simple key contributes.
fn key_segments(scalar: Scalar) -> Result<Vec<String>, Error> {
    match scalar.kind {
        ScalarKind::Bare | ScalarKind::Basic | ScalarKind::Literal => Ok(vec![scalar.text]),
        ScalarKind::MultilineBasic | ScalarKind::MultilineLiteral => Err(Error::semantic(
            "Malformed input: Invalid simple key: Found multiline string, but is not allowed",
        )),
        // `1.2` as a key is the dotted key `1`.`2`
        ScalarKind::Float => {
            let segments = match scalar.orig.split_once('.') {
                Some((first, second)) => vec![first.to_string(), second.to_string()],
                None => vec![scalar.orig.clone()],
            };
            for segment in &segments {
                check_bare(segment)?;
            }
            Ok(segments)
        }
        ScalarKind::Boolean
        | ScalarKind::Decimal
        | ScalarKind::Binary
        | ScalarKind::Octal
        | ScalarKind::Hex
        | ScalarKind::Inf
        | ScalarKind::PosInf
        | ScalarKind::NegInf
        | ScalarKind::Nan
        | ScalarKind::PosNan
        | ScalarKind::NegNan
        | ScalarKind::OffsetDateTime
        | ScalarKind::LocalDateTime
        | ScalarKind::LocalDate
        | ScalarKind::LocalTime => {
            check_bare(&scalar.orig)?;
            Ok(vec![scalar.orig])
        }
        ScalarKind::Comment => Err(Error::internal("Found a comment where a key was expected")),
    }
}

fn check_bare(text: &str) -> Result<(), Error> {
    if is_valid_bare_string(text) {
        Ok(())
    } else {
        Err(Error::semantic(format!(
            "Malformed input: Invalid bare simple key '{text}': only alphanumeric, underline, hyphen allowed. Consider adding quotations around the string."
        )))
    }
}
