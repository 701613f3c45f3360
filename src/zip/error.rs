//! Error types for archive writing.

use thiserror::Error;

/// Errors that can occur while writing a ZIP archive.
///
/// `InvalidFilename` is raised before any byte reaches the output and is
/// safe to retry with a corrected name. The mid-stream variants
/// (`ContentRead`, `Compression`, `SinkWrite`) are fatal to the writer:
/// the output may already hold partial, unpatchable bytes, so the archive
/// must be discarded and the writer refuses further use.
#[derive(Debug, Error)]
pub enum ZipError {
    /// Entry name rejected before anything was written.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidFilename { name: String, reason: &'static str },

    /// The content source failed mid-entry.
    #[error("failed to read entry content: {0}")]
    ContentRead(#[source] std::io::Error),

    /// The DEFLATE compressor failed.
    #[error("compression failed: {0}")]
    Compression(#[source] std::io::Error),

    /// The output sink rejected a write.
    #[error("failed to write archive output: {0}")]
    SinkWrite(#[source] std::io::Error),

    /// Caller protocol violation: writing after finalization, finalizing
    /// twice, or reusing a writer whose output is already corrupt.
    #[error("invalid writer state: {0}")]
    InvalidState(&'static str),
}

/// Result type for archive writing operations.
pub type Result<T> = std::result::Result<T, ZipError>;
