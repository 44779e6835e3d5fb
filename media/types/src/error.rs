/*!
    Error types for the media engine.
*/

use std::fmt;

/**
    Error type for the media engine.

    Only container-level failures and pre-work cancellation surface as
    errors. Per-stream conditions (no audio stream, decoder unavailable,
    mid-decode cancellation) are absorbed by the pipelines and reflected
    in the shape of the result instead.
*/
#[derive(Debug)]
pub enum Error {
    /// I/O error (file not found, permission denied, etc.)
    Io(std::io::Error),
    /// Container cannot be opened or parsed at all
    Open { message: String },
    /// Container opened but stream metadata cannot be resolved
    StreamInfo { message: String },
    /// Probing errored and no playable stream of either kind exists
    Unsupported { message: String },
    /// Cancellation was signaled before any work began
    Aborted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Open { message } => write!(f, "failed to open container: {message}"),
            Self::StreamInfo { message } => write!(f, "failed to resolve stream info: {message}"),
            Self::Unsupported { message } => write!(f, "unsupported media: {message}"),
            Self::Aborted => write!(f, "decode aborted before start"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Error {
    /**
        Create an open error with the given message.
    */
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open {
            message: message.into(),
        }
    }

    /**
        Create a stream info error with the given message.
    */
    pub fn stream_info(message: impl Into<String>) -> Self {
        Self::StreamInfo {
            message: message.into(),
        }
    }

    /**
        Create an unsupported media error with the given message.
    */
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /**
        Returns true if this error represents pre-work cancellation.
    */
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/**
    Result type alias for the media engine.
*/
pub type Result<T> = std::result::Result<T, Error>;
