//! Errors reported by a parse.

use std::fmt;

use tomlkeys_scalar::Location;

/// The class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An allocation failed.
    Memory,
    /// The grammar broke the event contract, or the driver's own bookkeeping
    /// is inconsistent.
    Internal,
    /// The grammar rejected the input.
    Syntactic,
    /// Well-formed input that violates a TOML rule the grammar cannot check.
    Semantic,
    /// The source could not be opened or read.
    Resource,
}

impl ErrorKind {
    /// Short name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Memory => "memory",
            ErrorKind::Internal => "internal",
            ErrorKind::Syntactic => "syntax",
            ErrorKind::Semantic => "semantic",
            ErrorKind::Resource => "resource",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error of a failed parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Error class.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Source location, when one is known.
    pub location: Option<Location>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn memory(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Memory, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn syntactic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntactic, message)
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic, message)
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource, message)
    }

    /// Attach a location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Line the error was detected on, or 0 when unknown.
    pub fn line(&self) -> u32 {
        self.location.map_or(0, |l| l.line())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error on line {}: {}", self.kind, self.line(), self.message)
    }
}

impl std::error::Error for Error {}
