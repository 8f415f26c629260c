//! Comments and blank lines waiting for the key they belong to.

use tomlkeys_tree::{Comment, CommentEntry};

use crate::Error;

/// Pending comments in document order, plus blank lines not yet turned
/// into an entry.
#[derive(Debug, Default)]
pub(crate) struct CommentQueue {
    entries: Vec<CommentEntry>,
    newlines: usize,
}

impl CommentQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether no entry is queued. Uncounted blank lines do not count.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Count one blank line.
    pub(crate) fn newline(&mut self) -> Result<(), Error> {
        self.newlines = self
            .newlines
            .checked_add(1)
            .ok_or_else(|| Error::internal("Blank line counter overflowed"))?;
        Ok(())
    }

    /// Queue a comment after the blank lines counted so far.
    pub(crate) fn push(&mut self, comment: Comment) -> Result<(), Error> {
        self.flush_newlines()?;
        self.reserve()?;
        self.entries.push(CommentEntry::Text(comment));
        Ok(())
    }

    fn flush_newlines(&mut self) -> Result<(), Error> {
        if self.newlines > 0 {
            self.reserve()?;
            self.entries.push(CommentEntry::BlankLines(self.newlines));
            self.newlines = 0;
        }
        Ok(())
    }

    fn reserve(&mut self) -> Result<(), Error> {
        self.entries
            .try_reserve(1)
            .map_err(|_| Error::memory("Out of memory while queueing a comment"))
    }

    /// Remove the first entry if it is a comment.
    pub(crate) fn take_first_text(&mut self) -> Option<Comment> {
        match self.entries.first() {
            Some(CommentEntry::Text(_)) => match self.entries.remove(0) {
                CommentEntry::Text(comment) => Some(comment),
                CommentEntry::BlankLines(_) => None,
            },
            _ => None,
        }
    }

    /// Take the single comment following `what` on the same line.
    ///
    /// Nothing queued yields `None`; anything but exactly one comment breaks
    /// the grammar contract.
    pub(crate) fn take_single(&mut self, what: &str) -> Result<Option<Comment>, Error> {
        if self.entries.len() > 1 {
            return Err(Error::internal(format!(
                "More than one comment existing after exiting {what}, expected up to one"
            )));
        }
        match self.entries.pop() {
            None => Ok(None),
            Some(CommentEntry::Text(comment)) => Ok(Some(comment)),
            Some(CommentEntry::BlankLines(_)) => Err(Error::internal(format!(
                "Expected a comment after exiting {what}, found blank lines"
            ))),
        }
    }

    /// Everything queued, blank lines included, leaving the queue empty.
    pub(crate) fn drain(&mut self) -> Result<Vec<CommentEntry>, Error> {
        self.flush_newlines()?;
        Ok(std::mem::take(&mut self.entries))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.newlines = 0;
    }
}
