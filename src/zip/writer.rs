//! Streaming ZIP archive writer.
//!
//! This module produces a ZIP archive as a single forward-only byte
//! stream, writing to any sink that implements [`AsyncWrite`].
//!
//! ## Writing Strategy
//!
//! ZIP headers normally carry each file's CRC and sizes, which are not
//! known until the file's content has been fully compressed. Instead of
//! seeking back to patch headers, every entry sets general-purpose flag
//! bit 3 and appends a data descriptor after its compressed data:
//!
//! 1. Local file header (CRC/size fields zero) at the current offset
//! 2. DEFLATE-compressed content, drained to the sink as it is produced
//! 3. Data descriptor with the final CRC-32 and both sizes
//!
//! After the last entry, the accumulated central directory and the end
//! of central directory record are written and the sink is shut down.
//! This keeps the whole pipeline compatible with pipes and sockets.

use std::io;

use flate2::{Compress, Compression, FlushCompress, Status};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::io::{ChunkSource, CountingWriter};

use super::error::{Result, ZipError};
use super::structures::{
    CentralDirEntry, DataDescriptor, EndOfCentralDirectory, LocalFileHeader,
};

/// Output buffer handed to the compressor before each drain (32 KiB).
///
/// Compressed output is written to the sink every time this buffer fills,
/// so memory stays bounded no matter how large an entry is.
const DEFLATE_BUF_SIZE: usize = 32 * 1024;

/// Most entries a classic (non-ZIP64) archive can describe.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// Characters rejected anywhere in an entry name.
const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Check that a name is safe to use as a ZIP entry path.
///
/// Names are `/`-separated UTF-8 paths. The name must be non-empty, every
/// segment must be non-empty (which also rules out leading and trailing
/// slashes), and no segment may contain `\`, `?`, `%`, `*`, `:`, `|`,
/// `"`, `<` or `>`.
///
/// # Errors
///
/// Returns [`ZipError::InvalidFilename`] describing the first violation.
pub fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ZipError::InvalidFilename {
            name: name.to_string(),
            reason: "name is empty",
        });
    }

    for segment in name.split('/') {
        if segment.is_empty() {
            return Err(ZipError::InvalidFilename {
                name: name.to_string(),
                reason: "empty path segment",
            });
        }
        if segment.contains(FORBIDDEN_NAME_CHARS) {
            return Err(ZipError::InvalidFilename {
                name: name.to_string(),
                reason: "contains a forbidden character",
            });
        }
    }

    Ok(())
}

/// Writer lifecycle. `Poisoned` latches after any mid-stream failure:
/// the sink may already hold partial entry bytes that cannot be unwound,
/// so the archive is corrupt and the writer refuses further use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Open,
    Finished,
    Poisoned,
}

/// Streaming ZIP archive writer.
///
/// Files are added one at a time with [`add_file`](Self::add_file); the
/// `&mut self` receivers serialize all operations on one writer, so no
/// two entries' bytes ever interleave and every entry's header offset is
/// well-defined. [`finalize`](Self::finalize) writes the central
/// directory and end-of-central-directory record, then shuts the sink
/// down.
///
/// ## Limitations
///
/// No ZIP64: entries whose compressed or uncompressed size reaches
/// 4 GiB, or archives whose central directory starts beyond 4 GiB,
/// produce invalid size fields. Entry names longer than 65535 bytes
/// overflow the 16-bit name-length field. Neither is checked. Adding
/// more than 65535 entries is rejected.
pub struct ZipStreamWriter<W> {
    sink: CountingWriter<W>,
    central_directory: Vec<CentralDirEntry>,
    level: Compression,
    state: WriterState,
}

impl<W: AsyncWrite + Unpin> ZipStreamWriter<W> {
    /// Create a writer with the default DEFLATE level (6).
    pub fn new(sink: W) -> Self {
        Self::with_compression(sink, Compression::default())
    }

    /// Create a writer with a specific DEFLATE level.
    pub fn with_compression(sink: W, level: Compression) -> Self {
        Self {
            sink: CountingWriter::new(sink),
            central_directory: Vec::new(),
            level,
            state: WriterState::Open,
        }
    }

    /// Total bytes emitted to the sink so far.
    pub fn bytes_emitted(&self) -> u64 {
        self.sink.bytes_written()
    }

    /// Number of entries added so far.
    pub fn entry_count(&self) -> usize {
        self.central_directory.len()
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    /// Add one file to the archive, consuming its content source.
    ///
    /// The content is read exactly once, in order. Each chunk feeds the
    /// CRC-32 accumulator and the compressor; compressed output is
    /// written to the sink as it becomes available, with every write
    /// awaited so the writer never runs ahead of the sink.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Entry path inside the archive, validated by
    ///   [`validate_entry_name`]
    /// * `content` - Source of the entry's bytes
    ///
    /// # Errors
    ///
    /// * [`ZipError::InvalidFilename`] - rejected before any write;
    ///   the writer stays usable
    /// * [`ZipError::ContentRead`], [`ZipError::Compression`],
    ///   [`ZipError::SinkWrite`] - mid-stream failure; the archive is
    ///   corrupt and the writer refuses further use
    /// * [`ZipError::InvalidState`] - writer already finalized,
    ///   poisoned, or at the 65535-entry format limit
    pub async fn add_file<S: ChunkSource>(&mut self, file_name: &str, content: S) -> Result<()> {
        self.check_open()?;
        validate_entry_name(file_name)?;
        if self.central_directory.len() >= MAX_ENTRIES {
            return Err(ZipError::InvalidState(
                "archive already holds 65535 entries",
            ));
        }

        match self.write_entry(file_name, content).await {
            Ok(entry) => {
                self.central_directory.push(entry);
                Ok(())
            }
            Err(err) => {
                self.state = WriterState::Poisoned;
                Err(err)
            }
        }
    }

    /// Finish the archive: write the central directory and the end of
    /// central directory record, then shut the sink down.
    ///
    /// A zero-entry archive is valid and consists of the 22-byte end of
    /// central directory record alone.
    ///
    /// # Errors
    ///
    /// * [`ZipError::SinkWrite`] - the trailer could not be written;
    ///   the archive is corrupt
    /// * [`ZipError::InvalidState`] - already finalized or poisoned
    pub async fn finalize(&mut self) -> Result<()> {
        self.check_open()?;

        match self.write_trailer().await {
            Ok(()) => {
                self.state = WriterState::Finished;
                Ok(())
            }
            Err(err) => {
                self.state = WriterState::Poisoned;
                Err(err)
            }
        }
    }

    fn check_open(&self) -> Result<()> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Finished => Err(ZipError::InvalidState(
                "archive has already been finalized",
            )),
            WriterState::Poisoned => Err(ZipError::InvalidState(
                "a previous write failed and the archive output is corrupt",
            )),
        }
    }

    /// Write one complete entry: header, compressed data, descriptor.
    ///
    /// Returns the central directory record for the entry, built only
    /// after both the checksum and the final sizes are known.
    async fn write_entry<S: ChunkSource>(
        &mut self,
        file_name: &str,
        mut content: S,
    ) -> Result<CentralDirEntry> {
        let header_offset = self.sink.bytes_written();

        let header = LocalFileHeader { file_name }
            .to_bytes()
            .map_err(ZipError::SinkWrite)?;
        self.sink
            .write_all(&header)
            .await
            .map_err(ZipError::SinkWrite)?;

        // One loop owns the source: each chunk feeds the checksum and the
        // compressor, and compressor output drains to the sink as it is
        // produced. The source is never read twice.
        let mut checksum = crc32fast::Hasher::new();
        let mut deflate = Compress::new(self.level, false);
        let mut out_buf = Vec::with_capacity(DEFLATE_BUF_SIZE);

        loop {
            let chunk = match content.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => return Err(ZipError::ContentRead(err)),
            };
            if chunk.is_empty() {
                continue;
            }
            checksum.update(&chunk);
            self.deflate_chunk(&mut deflate, &chunk, &mut out_buf).await?;
        }
        self.finish_deflate(&mut deflate, &mut out_buf).await?;

        let entry = CentralDirEntry {
            file_name: file_name.to_string(),
            crc32: checksum.finalize(),
            compressed_size: deflate.total_out() as u32,
            uncompressed_size: deflate.total_in() as u32,
            header_offset: header_offset as u32,
        };

        let descriptor = DataDescriptor {
            crc32: entry.crc32,
            compressed_size: entry.compressed_size,
            uncompressed_size: entry.uncompressed_size,
        }
        .to_bytes()
        .map_err(ZipError::SinkWrite)?;
        self.sink
            .write_all(&descriptor)
            .await
            .map_err(ZipError::SinkWrite)?;

        Ok(entry)
    }

    /// Feed one content chunk through the compressor, draining output
    /// to the sink whenever the buffer fills.
    async fn deflate_chunk(
        &mut self,
        deflate: &mut Compress,
        mut input: &[u8],
        out_buf: &mut Vec<u8>,
    ) -> Result<()> {
        while !input.is_empty() {
            out_buf.clear();
            let consumed_before = deflate.total_in();
            deflate
                .compress_vec(input, out_buf, FlushCompress::None)
                .map_err(|err| ZipError::Compression(io::Error::other(err)))?;
            let consumed = (deflate.total_in() - consumed_before) as usize;
            input = &input[consumed..];

            if !out_buf.is_empty() {
                self.sink
                    .write_all(out_buf)
                    .await
                    .map_err(ZipError::SinkWrite)?;
            }
        }
        Ok(())
    }

    /// Signal end of input to the compressor and drain everything it
    /// still has buffered.
    async fn finish_deflate(
        &mut self,
        deflate: &mut Compress,
        out_buf: &mut Vec<u8>,
    ) -> Result<()> {
        loop {
            out_buf.clear();
            let status = deflate
                .compress_vec(&[], out_buf, FlushCompress::Finish)
                .map_err(|err| ZipError::Compression(io::Error::other(err)))?;

            if !out_buf.is_empty() {
                self.sink
                    .write_all(out_buf)
                    .await
                    .map_err(ZipError::SinkWrite)?;
            }
            if status == Status::StreamEnd {
                break;
            }
        }
        Ok(())
    }

    async fn write_trailer(&mut self) -> Result<()> {
        // The EOCD records where the central directory begins: the byte
        // position just past the last entry's data descriptor.
        let cd_offset = self.sink.bytes_written();

        for entry in &self.central_directory {
            let record = entry.to_bytes().map_err(ZipError::SinkWrite)?;
            self.sink
                .write_all(&record)
                .await
                .map_err(ZipError::SinkWrite)?;
        }
        let cd_size = self.sink.bytes_written() - cd_offset;

        let eocd = EndOfCentralDirectory {
            entry_count: self.central_directory.len() as u16,
            cd_size: cd_size as u32,
            cd_offset: cd_offset as u32,
        }
        .to_bytes()
        .map_err(ZipError::SinkWrite)?;
        self.sink
            .write_all(&eocd)
            .await
            .map_err(ZipError::SinkWrite)?;

        self.sink.shutdown().await.map_err(ZipError::SinkWrite)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["a.txt", "dir/a.txt", "a/b/c", "ünïcode.txt", "spaces ok.txt"] {
            assert!(validate_entry_name(name).is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            validate_entry_name(""),
            Err(ZipError::InvalidFilename { .. })
        ));
    }

    #[test]
    fn rejects_forbidden_characters() {
        for name in [
            "back\\slash", "what?", "per%cent", "st*ar", "co:lon", "pi|pe", "quo\"te", "l<t",
            "g>t",
        ] {
            assert!(
                matches!(
                    validate_entry_name(name),
                    Err(ZipError::InvalidFilename { .. })
                ),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_segments() {
        for name in ["/leading", "trailing/", "double//slash", "/"] {
            assert!(
                matches!(
                    validate_entry_name(name),
                    Err(ZipError::InvalidFilename { .. })
                ),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn forbidden_character_inside_segment() {
        assert!(validate_entry_name("dir/bad:name/file").is_err());
    }
}
