use std::path::PathBuf;

use thiserror::Error;

use crate::tag::Tag;

#[derive(Debug, Error)]
pub enum Error {
    /// Structural violation in a content file. Always fatal to the load in progress.
    #[error("{file}: {kind} (record {record}, subrecord {subrecord}, offset {offset:#x})")]
    Format {
        file: String,
        record: Tag,
        subrecord: Tag,
        offset: usize,
        kind: FormatErrorKind,
    },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What exactly went wrong inside an [`Error::Format`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatErrorKind {
    #[error("not a valid Morrowind file (first record is {0})")]
    NotTes3(Tag),

    #[error("unsupported file format version {0:#010x}")]
    UnsupportedVersion(u32),

    #[error("subrecord size mismatch: expected {expected} bytes, found {found}")]
    SubSizeMismatch { expected: usize, found: usize },

    #[error("expected subrecord {expected} but got {found}")]
    UnexpectedSubrecord { expected: Tag, found: Tag },

    #[error("end of record while reading sub-record header")]
    EndOfRecord,

    #[error("not enough bytes left in record for this subrecord ({size} > {left})")]
    SubrecordOverrun { size: usize, left: usize },

    #[error("record size is larger than rest of file ({size} > {left})")]
    RecordOverrun { size: usize, left: usize },

    #[error("previous record contains {0} unread bytes")]
    UnreadBytes(usize),

    #[error("end of file: {0}")]
    EndOfFile(&'static str),

    #[error("{0}")]
    Decode(String),

    #[error("invalid value: {0}")]
    Invalid(String),
}

impl Error {
    /// The structural error kind, if this is a format error.
    pub fn format_kind(&self) -> Option<&FormatErrorKind> {
        match self {
            Error::Format { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
