//! # zipstream
//!
//! A streaming zip utility that writes archives in a single pass.
//!
//! This library provides functionality to create ZIP archives as a
//! forward-only byte stream. The whole archive is produced incrementally:
//! file contents are compressed and written out as they are read, so
//! nothing is buffered and the destination never needs to seek - suitable
//! for pipes, sockets and any other write-once output.
//!
//! ## Features
//!
//! - Write ZIP archives to any async byte sink (file, socket, memory)
//! - Single-pass output using data descriptors, no header patching
//! - DEFLATE compression with selectable level
//! - Streaming input: each file's content is read exactly once, in chunks
//! - UTF-8 entry names with path validation
//!
//! ## Example
//!
//! ```no_run
//! use tokio::fs::File;
//! use zipstream::{ReaderSource, ZipStreamWriter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sink = File::create("out.zip").await?;
//!     let mut writer = ZipStreamWriter::new(sink);
//!
//!     // In-memory content
//!     writer.add_file("hello.txt", &b"hello world"[..]).await?;
//!
//!     // Streamed content
//!     let input = File::open("Cargo.toml").await?;
//!     writer.add_file("Cargo.toml", ReaderSource::new(input)).await?;
//!
//!     writer.finalize().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use io::{ChunkSource, CountingWriter, ReaderSource};
pub use zip::{ZipError, ZipStreamWriter, validate_entry_name};
