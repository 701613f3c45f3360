use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::ChunkSource;

/// Default chunk size handed to the archive writer (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Adapts any async reader into a [`ChunkSource`]
///
/// Chunk boundaries follow whatever the reader returns, capped at the
/// configured chunk size. The archive contents are identical regardless
/// of how the input is chunked.
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: AsyncRead + Unpin + Send> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Use a specific maximum chunk size (clamped to at least 1 byte)
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ChunkSource for ReaderSource<R> {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.chunk_size];
        let n = self.reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf))
    }
}
