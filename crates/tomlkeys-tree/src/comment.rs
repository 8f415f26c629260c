//! Comments attached to keys.

/// A single comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Translated comment text (without the `#` marker).
    pub text: String,
    /// Exact source spelling.
    pub orig: String,
}

impl Comment {
    /// Create a new comment.
    pub fn new(text: impl Into<String>, orig: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            orig: orig.into(),
        }
    }
}

/// An entry of a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEntry {
    /// A comment line.
    Text(Comment),
    /// A run of blank lines.
    BlankLines(usize),
}

/// All comments attached to a key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    /// Comment on the same line as the key, after its value or header.
    pub inline: Option<Comment>,
    /// Comments and blank lines preceding the key.
    pub leading: Vec<CommentEntry>,
    /// Comments inside an array after its last element.
    pub trailing: Vec<CommentEntry>,
}

impl Comments {
    /// Whether no comment of any kind is attached.
    pub fn is_empty(&self) -> bool {
        self.inline.is_none() && self.leading.is_empty() && self.trailing.is_empty()
    }
}
