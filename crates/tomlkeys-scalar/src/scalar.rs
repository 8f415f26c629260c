//! Scalar values produced by the TOML lexer.

use crate::Location;

/// The kind of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    // Strings
    /// Unquoted identifier-like text: `key`, `a-b_c`
    Bare,
    /// Basic string: `"..."`
    Basic,
    /// Literal string: `'...'`
    Literal,
    /// Multiline basic string: `"""..."""`
    MultilineBasic,
    /// Multiline literal string: `'''...'''`
    MultilineLiteral,

    /// `true` or `false`
    Boolean,

    // Integers
    /// Decimal integer: `42`, `-1_000`
    Decimal,
    /// Binary integer: `0b1010`
    Binary,
    /// Octal integer: `0o755`
    Octal,
    /// Hexadecimal integer: `0xdead_beef`
    Hex,

    // Floats
    /// Finite float: `3.14`, `1e10`
    Float,
    /// `inf`
    Inf,
    /// `+inf`
    PosInf,
    /// `-inf`
    NegInf,
    /// `nan`
    Nan,
    /// `+nan`
    PosNan,
    /// `-nan`
    NegNan,

    // Datetimes
    /// `1979-05-27T07:32:00Z`
    OffsetDateTime,
    /// `1979-05-27T07:32:00`
    LocalDateTime,
    /// `1979-05-27`
    LocalDate,
    /// `07:32:00`
    LocalTime,

    /// A comment line: `# ...`
    Comment,
}

impl ScalarKind {
    /// Whether this is one of the string kinds, including bare strings.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            ScalarKind::Bare
                | ScalarKind::Basic
                | ScalarKind::Literal
                | ScalarKind::MultilineBasic
                | ScalarKind::MultilineLiteral
        )
    }

    /// Whether this is a multiline string kind.
    pub fn is_multiline(&self) -> bool {
        matches!(self, ScalarKind::MultilineBasic | ScalarKind::MultilineLiteral)
    }

    /// Whether this is one of the datetime kinds.
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            ScalarKind::OffsetDateTime
                | ScalarKind::LocalDateTime
                | ScalarKind::LocalDate
                | ScalarKind::LocalTime
        )
    }

    /// Human-readable name, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ScalarKind::Bare => "bare string",
            ScalarKind::Basic => "basic string",
            ScalarKind::Literal => "literal string",
            ScalarKind::MultilineBasic => "multiline basic string",
            ScalarKind::MultilineLiteral => "multiline literal string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Decimal => "decimal integer",
            ScalarKind::Binary => "binary integer",
            ScalarKind::Octal => "octal integer",
            ScalarKind::Hex => "hexadecimal integer",
            ScalarKind::Float => "float",
            ScalarKind::Inf | ScalarKind::PosInf | ScalarKind::NegInf => "infinity",
            ScalarKind::Nan | ScalarKind::PosNan | ScalarKind::NegNan => "not-a-number",
            ScalarKind::OffsetDateTime => "offset datetime",
            ScalarKind::LocalDateTime => "local datetime",
            ScalarKind::LocalDate => "local date",
            ScalarKind::LocalTime => "local time",
            ScalarKind::Comment => "comment",
        }
    }
}

/// A scalar with its translated text, its source spelling and location.
///
/// `text` is what the lexer made of the token: escape-decoded content for
/// strings, the body of a comment. `orig` is the exact source spelling; for
/// quoted strings that is the content between the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    /// The kind of scalar.
    pub kind: ScalarKind,
    /// Lexer-translated text.
    pub text: String,
    /// Exact source text.
    pub orig: String,
    /// Where the scalar was found.
    pub location: Location,
}

impl Scalar {
    /// Create a new scalar.
    pub fn new(
        kind: ScalarKind,
        text: impl Into<String>,
        orig: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            orig: orig.into(),
            location,
        }
    }

    /// A scalar whose translated text equals its source spelling.
    pub fn verbatim(kind: ScalarKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            orig: text.clone(),
            text,
            location: Location::default(),
        }
    }

    /// Builder-style setter for the location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Builder-style setter placing the scalar on `line`.
    pub fn at_line(self, line: u32) -> Self {
        self.at(Location::at_line(line))
    }

    /// The line the scalar starts on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.location.line()
    }
}
