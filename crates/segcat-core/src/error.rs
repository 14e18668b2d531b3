//! Unified error type for segcat.
//!
//! Every crate in the workspace funnels its failures into [`Error`]. The
//! coarse [`ErrorKind`] lets callers branch on the failure class without
//! matching on payloads, and is what the packet pump records when a source
//! becomes exhausted.

use std::fmt;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    Permission,
    InvalidData,
    NotSupported,
    Open,
    EndOfSequence,
    Allocation,
    Io,
    Reader,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Format => "format",
            ErrorKind::Permission => "permission",
            ErrorKind::InvalidData => "invalid-data",
            ErrorKind::NotSupported => "not-supported",
            ErrorKind::Open => "open",
            ErrorKind::EndOfSequence => "end-of-sequence",
            ErrorKind::Allocation => "allocation",
            ErrorKind::Io => "io",
            ErrorKind::Reader => "reader",
        };
        f.write_str(name)
    }
}

/// Unified error type covering all failure modes in segcat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A script line could not be understood.
    #[error("Line {line}: {message}")]
    Format {
        /// 1-based line number in the script.
        line: usize,
        /// Human-readable error description.
        message: String,
    },

    /// A segment path was rejected by the safety whitelist.
    #[error("Unsafe file name '{0}'")]
    Permission(String),

    /// The input is structurally unusable (e.g. an empty segment list).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The requested operation cannot be performed on this source.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// A segment could not be opened or analyzed.
    #[error("Impossible to open '{url}': {message}")]
    Open {
        /// Locator of the segment that failed to open.
        url: String,
        /// Human-readable error description.
        message: String,
    },

    /// There are no more segments to read.
    #[error("End of sequence")]
    EndOfSequence,

    /// A buffer or table could not be grown.
    #[error("Allocation failure: {0}")]
    Allocation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A segment reader failed while reading or seeking.
    #[error("Reader error: {0}")]
    Reader(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } => ErrorKind::Format,
            Error::Permission(_) => ErrorKind::Permission,
            Error::InvalidData(_) => ErrorKind::InvalidData,
            Error::NotSupported(_) => ErrorKind::NotSupported,
            Error::Open { .. } => ErrorKind::Open,
            Error::EndOfSequence => ErrorKind::EndOfSequence,
            Error::Allocation(_) => ErrorKind::Allocation,
            Error::Io { .. } => ErrorKind::Io,
            Error::Reader(_) => ErrorKind::Reader,
        }
    }

    /// Whether this error marks the end of the segment sequence.
    pub fn is_end_of_sequence(&self) -> bool {
        matches!(self, Error::EndOfSequence)
    }

    /// Convenience constructor for [`Error::Format`].
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            line,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Open`].
    pub fn open(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Open {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::InvalidData`].
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Error::InvalidData(message.into())
    }

    /// Convenience constructor for [`Error::NotSupported`].
    pub fn not_supported(message: impl Into<String>) -> Self {
        Error::NotSupported(message.into())
    }

    /// Convenience constructor for [`Error::Reader`].
    pub fn reader(message: impl fmt::Display) -> Self {
        Error::Reader(message.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
