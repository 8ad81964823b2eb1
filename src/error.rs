//! Error types for decoding scalar values, loading pigsty files and dumping them back to text.

use crate::fields::FieldIndex;
use std::fmt;

/// Failure of a single scalar decoder (integer, string, IPv4 address).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty value")]
    Empty,
    #[error("invalid integer `{0}`")]
    InvalidInteger(String),
    #[error("integer `{token}` does not fit in {bits} bits")]
    OutOfRange { token: String, bits: u8 },
    #[error("invalid string literal `{0}`")]
    InvalidString(String),
    #[error("invalid IPv4 address `{0}`")]
    InvalidAddress(String),
}

/// An entry that has no pigsty text form which loads back to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    #[error("entry {entry} has neither a signature nor fields")]
    EmptyEntry { entry: usize },
    #[error("entry {entry}: field `{field}` holds {dsize} bytes, expected {expected}")]
    BadSize {
        entry: usize,
        field: FieldIndex,
        dsize: usize,
        expected: usize,
    },
    #[error("entry {entry}: field `{field}` value {value} does not fit in {bits} bits")]
    TooWide {
        entry: usize,
        field: FieldIndex,
        value: u32,
        bits: u8,
    },
}

/// 1-based line/column inside the pigsty source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Why a whole file was rejected. No entries survive any of these.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("input is not valid UTF-8 (byte offset {offset})")]
    Encoding { offset: usize },
    #[error("source is {len} bytes, limit is {max}")]
    TooLarge { len: usize, max: usize },
    #[error("{location}: malformed block: {message}")]
    MalformedBlock { location: Location, message: String },
    #[error("{location}: unknown field `{key}`")]
    UnknownField { location: Location, key: String },
    #[error("{location}: signature given twice in one block")]
    DuplicateSignature { location: Location },
    #[error("{location}: field `{key}`: {source}")]
    InvalidValue {
        location: Location,
        key: String,
        #[source]
        source: DecodeError,
    },
}

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Encoding,
    TooLarge,
    MalformedBlock,
    UnknownField,
    InvalidInteger,
    InvalidString,
    InvalidAddress,
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Io(_) => ErrorKind::Io,
            LoadError::Encoding { .. } => ErrorKind::Encoding,
            LoadError::TooLarge { .. } => ErrorKind::TooLarge,
            LoadError::MalformedBlock { .. } | LoadError::DuplicateSignature { .. } => {
                ErrorKind::MalformedBlock
            }
            LoadError::UnknownField { .. } => ErrorKind::UnknownField,
            LoadError::InvalidValue { source, .. } => match source {
                DecodeError::InvalidString(_) => ErrorKind::InvalidString,
                DecodeError::InvalidAddress(_) => ErrorKind::InvalidAddress,
                DecodeError::Empty
                | DecodeError::InvalidInteger(_)
                | DecodeError::OutOfRange { .. } => ErrorKind::InvalidInteger,
            },
        }
    }

    /// Position in the source, when the error points at one.
    pub fn location(&self) -> Option<Location> {
        match self {
            LoadError::MalformedBlock { location, .. }
            | LoadError::UnknownField { location, .. }
            | LoadError::DuplicateSignature { location }
            | LoadError::InvalidValue { location, .. } => Some(*location),
            _ => None,
        }
    }
}
