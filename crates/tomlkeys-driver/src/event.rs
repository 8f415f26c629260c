//! Grammar events.

use tomlkeys_scalar::{Location, Scalar};

/// One grammar production, as reported by the front end.
///
/// Events arrive in document order. Scalars are moved into the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Start of the document.
    EnterDocument,
    /// End of the document.
    ExitDocument,

    /// Start of a (possibly dotted) key.
    EnterKey,
    /// End of a key: the assembled name becomes the insertion point.
    ExitKey,
    /// One segment of the current key.
    SimpleKey(Scalar),
    /// End of a `key = value` pair.
    ExitKeyValue,
    /// A comment directly after a pair, on the same line.
    ExitInlineCommentAfterPair,
    /// A comment directly after a table header, on the same line.
    ExitInlineCommentAfterTable,

    /// A scalar value.
    Value(Scalar),

    /// `[` of a `[table]` header.
    EnterSimpleTable,
    /// `]` of a `[table]` header.
    ExitSimpleTable,
    /// `[[` of a `[[table.array]]` header.
    EnterTableArray,
    /// `]]` of a `[[table.array]]` header.
    ExitTableArray,

    /// `[` of an array value with at least one element.
    EnterArray,
    /// `]` of an array value.
    ExitArray,
    /// `[]`
    EmptyArray,
    /// Start of one array element.
    EnterArrayElement,
    /// End of one array element.
    ExitArrayElement,

    /// `{` of an inline table with at least one pair.
    EnterInlineTable,
    /// `}` of an inline table.
    ExitInlineTable,
    /// `{}`
    EmptyInlineTable,

    /// A comment.
    Comment(Scalar),
    /// A blank line.
    Newline,

    /// The grammar rejected the input.
    SyntaxError {
        /// What the grammar expected or found.
        message: String,
        /// Where it happened.
        location: Location,
    },
}

impl Event {
    /// The scalar carried by this event, if any.
    pub fn scalar(&self) -> Option<&Scalar> {
        match self {
            Event::SimpleKey(scalar) | Event::Value(scalar) | Event::Comment(scalar) => Some(scalar),
            _ => None,
        }
    }
}
