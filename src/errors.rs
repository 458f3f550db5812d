//! Error taxonomy for parsing, resolution and traversal
//!
//! Parsing failures are split in two: `Format` when a line does not have the
//! expected shape at all, `Parse` when the shape is right but the content is
//! unusable (bad timestamp, truncated record, ...).

use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: unexpected format: {reason}")]
    Format { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("unsupported output mode: {0}")]
    InvalidMode(String),

    #[error("unknown revision or object: {0}")]
    Resolution(String),

    #[error("git exited with {status}: {stderr}")]
    Git { status: ExitStatus, stderr: String },

    #[error(transparent)]
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    /// Streams report producer failures as I/O errors wrapping an `Error`;
    /// unwrap those so callers see the original kind.
    fn from(err: std::io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<Error>()) {
            return Error::Io(err);
        }

        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(inner)) => *inner,
            Some(Err(inner)) => Error::Io(std::io::Error::new(kind, inner)),
            None => Error::Io(kind.into()),
        }
    }
}

impl Error {
    pub fn format(line: usize, reason: impl Into<String>) -> Self {
        Error::Format {
            line,
            reason: reason.into(),
        }
    }

    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Attach the stream position to an error raised by a line-level decoder
    pub fn at_line(self, line_no: usize) -> Self {
        match self {
            Error::Format { reason, .. } => Error::Format {
                line: line_no,
                reason,
            },
            Error::Parse { reason, .. } => Error::Parse {
                line: line_no,
                reason,
            },
            other => other,
        }
    }

    /// True for the two malformed-input kinds
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Error::Format { .. } | Error::Parse { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
