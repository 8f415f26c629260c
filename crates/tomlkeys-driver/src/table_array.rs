//! Open `[[table.array]]` scopes.

use tomlkeys_tree::{KeyName, KeySink, array_index, parse_array_index};
use tracing::debug;

use crate::Error;

/// One open table array and the index of its current element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    /// Unindexed name, e.g. `user:/fruit/variety`.
    pub(crate) name: KeyName,
    pub(crate) index: usize,
}

/// How a `[table]` header relates to the open table arrays.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Rebase {
    /// The header is not below any open table array.
    Outside,
    /// The header lies below an open table array; this is its name inside
    /// the array's current element.
    Inside(KeyName),
    /// The header names an open table array itself.
    ArrayItself,
}

/// Stack of open table arrays, outermost first. Every frame's name lies
/// below the name of the frame beneath it.
#[derive(Debug, Default)]
pub(crate) struct TableArrayStack {
    frames: Vec<Frame>,
}

impl TableArrayStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    /// Enter the next element of the table array `name`.
    ///
    /// The same name as the top advances its index. A name below the top
    /// opens a nested array. Anything else closes frames until one of those
    /// holds; with no frame left, enclosing arrays already recorded in
    /// `sink` are reopened first. A newly opened array continues after the
    /// last element `sink` already holds for it.
    pub(crate) fn open<S: KeySink + ?Sized>(
        &mut self,
        name: &KeyName,
        root: &KeyName,
        sink: &S,
    ) -> Result<(), Error> {
        loop {
            let Some(top) = self.frames.last_mut() else {
                self.restore_enclosing(name, root, sink)?;
                break;
            };
            if top.name == *name {
                top.index += 1;
                debug!(name = %name, index = top.index, "next table array element");
                return Ok(());
            }
            if name.is_below(&top.name) {
                break;
            }
            let closed = self.frames.pop();
            debug!(name = ?closed.map(|f| f.name.to_string()), "table array closed");
        }
        let index = self.resume_index(name, root, sink)?;
        debug!(name = %name, index, depth = self.frames.len() + 1, "table array opened");
        self.push(Frame {
            name: name.clone(),
            index,
        })
    }

    fn push(&mut self, frame: Frame) -> Result<(), Error> {
        self.frames
            .try_reserve(1)
            .map_err(|_| Error::memory("Out of memory while opening a table array"))?;
        self.frames.push(frame);
        Ok(())
    }

    /// Reopen every table array enclosing `name` that the sink already knows.
    fn restore_enclosing<S: KeySink + ?Sized>(
        &mut self,
        name: &KeyName,
        root: &KeyName,
        sink: &S,
    ) -> Result<(), Error> {
        for len in root.len() + 1..name.len() {
            let ancestor = KeyName::from_segments(name.segments()[..len].iter().cloned());
            let array_root = self.array_root(&ancestor, root)?;
            let last = sink
                .lookup(&array_root)
                .filter(|key| key.is_table_array())
                .and_then(|key| key.array_marker())
                .and_then(parse_array_index);
            if let Some(index) = last {
                debug!(name = %ancestor, index, "table array restored");
                self.push(Frame {
                    name: ancestor,
                    index,
                })?;
            }
        }
        Ok(())
    }

    /// Index a freshly opened array `name` starts at.
    fn resume_index<S: KeySink + ?Sized>(
        &self,
        name: &KeyName,
        root: &KeyName,
        sink: &S,
    ) -> Result<usize, Error> {
        let array_root = self.array_root(name, root)?;
        let last = sink
            .lookup(&array_root)
            .filter(|key| key.is_table_array())
            .and_then(|key| key.array_marker())
            .and_then(parse_array_index);
        Ok(last.map_or(0, |index| index + 1))
    }

    /// Name of the array container for `name` inside the current elements
    /// of the open frames.
    fn array_root(&self, name: &KeyName, root: &KeyName) -> Result<KeyName, Error> {
        let (mut resolved, base) = match self.frames.last() {
            Some(top) => (self.element_name(root)?, &top.name),
            None => (root.clone(), root),
        };
        let rest = name
            .relative_to(base)
            .ok_or_else(|| Error::internal(format!("Table array '{name}' is outside of '{base}'")))?;
        for segment in rest {
            resolved.push(segment.as_str());
        }
        Ok(resolved)
    }

    /// Name of the current element of the innermost open array, with every
    /// enclosing array's index spliced in: `root/a/#1/b/#0`.
    pub(crate) fn element_name(&self, root: &KeyName) -> Result<KeyName, Error> {
        self.indexed_prefix(self.frames.len(), root)
    }

    fn indexed_prefix(&self, depth: usize, root: &KeyName) -> Result<KeyName, Error> {
        let mut resolved = root.clone();
        let mut base = root;
        for frame in &self.frames[..depth] {
            let rest = frame.name.relative_to(base).ok_or_else(|| {
                Error::internal(format!("Table array '{}' is outside of '{base}'", frame.name))
            })?;
            for segment in rest {
                resolved.push(segment.as_str());
            }
            resolved.push(array_index(frame.index));
            base = &frame.name;
        }
        Ok(resolved)
    }

    /// Place a `[table]` header `name` (resolved from the root) relative to
    /// the open table arrays.
    pub(crate) fn rebase(&self, name: &KeyName, root: &KeyName) -> Result<Rebase, Error> {
        for depth in (1..=self.frames.len()).rev() {
            let frame = &self.frames[depth - 1];
            if *name == frame.name {
                return Ok(Rebase::ArrayItself);
            }
            if let Some(rest) = name.relative_to(&frame.name) {
                let mut resolved = self.indexed_prefix(depth, root)?;
                for segment in rest {
                    resolved.push(segment.as_str());
                }
                return Ok(Rebase::Inside(resolved));
            }
        }
        Ok(Rebase::Outside)
    }

    /// Whether every frame lies strictly below the one beneath it, and the
    /// outermost below `root`.
    pub(crate) fn is_well_nested(&self, root: &KeyName) -> bool {
        let mut base = root;
        for frame in &self.frames {
            if !frame.name.is_below(base) {
                return false;
            }
            base = &frame.name;
        }
        true
    }
}
