//! Error types for the public surface of the crate.
//!
//! Internally the crate uses `anyhow` and attaches context as errors bubble up. At the boundary of
//! a public operation the error is tagged with an `ErrorType` so that callers (the CLI, the
//! interactive session, tests) can tell the failure modes apart without string matching.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The kind of failure that occurred.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A non-positive or non-numeric amount was supplied to an add operation.
    InvalidAmount,
    /// An Outcome was added through the income path or vice versa. This is a programming error.
    WrongEntryKind,
    /// No spreadsheet codec is available for the requested file.
    CodecUnavailable,
    /// The file bytes could not be decoded into rows.
    DecodeFailure,
    /// There is nothing in the ledger to export.
    EmptyExport,
    /// The configuration could not be created, loaded or saved.
    Config,
    /// A file could not be read or written.
    Io,
    /// A session command could not be understood.
    Usage,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. It wraps an `anyhow::Error`, which holds the chain of context messages,
/// and an `ErrorType` which classifies the failure.
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

pub type Result<T> = std::result::Result<T, Error>;

/// The internal result type. Errors are given context as they bubble up and are converted to the
/// public `Result` with `IntoResult::pub_result`.
pub(crate) type Res<T> = anyhow::Result<T>;

impl Error {
    pub fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    /// Create an error from a plain message.
    pub fn msg(error_type: ErrorType, message: impl Display) -> Self {
        Self::new(error_type, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.error_type, self.source)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Alternate formatting prints the whole context chain on one line.
        write!(f, "{:#}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.source()
    }
}

/// Converts internal `anyhow` results into public results tagged with an `ErrorType`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
