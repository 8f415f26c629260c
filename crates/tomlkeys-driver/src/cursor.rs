//! The cursor stack: where the next key or value is inserted.

use tomlkeys_tree::Key;
use tracing::trace;

use crate::Error;
use crate::arena::{NodeArena, NodeId};

/// Stack of open nodes. The bottom frame is the root and stays for the
/// whole parse.
#[derive(Debug)]
pub(crate) struct CursorStack {
    frames: Vec<NodeId>,
}

impl CursorStack {
    pub(crate) fn new(root: NodeId) -> Self {
        Self { frames: vec![root] }
    }

    /// A stack without even a root, for a driver that failed to start.
    pub(crate) fn empty() -> Self {
        Self { frames: Vec::new() }
    }

    /// Store `key` in the arena and make it the new top.
    pub(crate) fn push_new(&mut self, arena: &mut NodeArena, key: Key) -> Result<NodeId, Error> {
        self.frames
            .try_reserve(1)
            .map_err(|_| Error::memory("Out of memory while opening a key"))?;
        trace!(name = %key.name(), depth = self.frames.len(), "push");
        let id = arena.insert(key)?;
        self.frames.push(id);
        Ok(id)
    }

    /// Close the top frame. The root frame cannot be closed.
    pub(crate) fn pop(&mut self, arena: &mut NodeArena) -> Result<(), Error> {
        if self.frames.len() <= 1 {
            return Err(Error::internal("Wanted to close a key, but only the root key is open"));
        }
        if let Some(id) = self.frames.pop() {
            trace!(depth = self.frames.len(), "pop");
            arena.release(id);
        }
        Ok(())
    }

    pub(crate) fn top(&self) -> Result<NodeId, Error> {
        self.frames
            .last()
            .copied()
            .ok_or_else(|| Error::internal("Cursor stack is empty"))
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Close every frame, the root included.
    pub(crate) fn unwind(&mut self, arena: &mut NodeArena) {
        while let Some(id) = self.frames.pop() {
            arena.release(id);
        }
    }
}
