mod counter;
mod source;

pub use counter::CountingWriter;
pub use source::ReaderSource;

use std::io;

use async_trait::async_trait;

/// Trait for producers of ordered content chunks
///
/// A source is consumed exactly once: `next_chunk` yields chunks in order
/// until it returns `Ok(None)`. There is no rewind; the archive writer
/// reads each source in a single pass.
#[async_trait]
pub trait ChunkSource: Send {
    /// Produce the next chunk of content, or `None` once the source is exhausted
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// In-memory content as a one-shot source yielding the whole slice
#[async_trait]
impl ChunkSource for &[u8] {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let rest = std::mem::take(self);
        if rest.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rest.to_vec()))
        }
    }
}
