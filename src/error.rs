//! Error types for the aggregation engine.
//!
//! Library code returns [`Error`]; the binary wraps it in `anyhow` at the edge.

use std::io;

use thiserror::Error;

use crate::planner::Chunk;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single record could not be turned into a `(key, value)` pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing delimiter {delimiter:?}")]
    MissingDelimiter { delimiter: char },

    #[error("expected 2 fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid measurement {text:?}")]
    InvalidValue { text: String },
}

#[derive(Error, Debug)]
pub enum Error {
    /// No newline inside the lookahead window while snapping a chunk boundary.
    #[error("no newline within {window} bytes after offset {offset}")]
    Planning { offset: u64, window: usize },

    /// A malformed record; `offset` is the byte offset of its first byte.
    #[error("malformed record at byte {offset} ({record:?}): {source}")]
    Parse {
        offset: u64,
        record: String,
        #[source]
        source: ParseError,
    },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Any failure inside a scan worker, tagged with the chunk it was assigned.
    #[error("chunk {index} (bytes {start}..{end}) failed: {source}")]
    Worker {
        index: usize,
        start: u64,
        end: u64,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn worker(index: usize, chunk: &Chunk, source: Error) -> Self {
        Error::Worker {
            index,
            start: chunk.start,
            end: chunk.end(),
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through worker wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Worker { source, .. } => source.root(),
            other => other,
        }
    }
}
