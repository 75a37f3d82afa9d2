//! Error types for the watch layer.

use thiserror::Error;

/// Errors fatal to the watch loop.
///
/// Anything here takes the whole process down; per-event failures never
/// surface through this type, they are logged inside the unit of work.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The underlying watch primitive failed (e.g. exhausted OS resources).
    #[error("filesystem watch failed: {0}")]
    Notify(#[from] notify::Error),

    /// The notification stream ended while watches were still registered.
    #[error("filesystem event stream closed unexpectedly")]
    StreamClosed,
}

pub type Result<T> = std::result::Result<T, WatchError>;
