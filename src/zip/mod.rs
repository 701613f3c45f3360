//! ZIP archive creation as a forward-only byte stream.
//!
//! This module provides functionality for writing ZIP archives to
//! non-seekable destinations, producing the whole archive in a single
//! pass with no buffering of file contents.
//!
//! ## Architecture
//!
//! The module is organized into three main components:
//!
//! - [`structures`]: Binary encodings of the ZIP format elements (local
//!   file header, data descriptor, central directory, EOCD)
//! - [`writer`]: The streaming archive writer and entry-name validation
//! - [`error`]: The error taxonomy for archive writing
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! Because each entry's CRC and sizes follow its data in a descriptor
//! (general-purpose flag bit 3), headers never need patching and the
//! output never needs to seek - perfect for pipes and sockets.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - DEFLATE compression with selectable level
//! - UTF-8 entry names (flag bit 11)
//!
//! ## Limitations
//!
//! - No ZIP64 (4 GiB file/archive limits, at most 65535 entries)
//! - No encryption support
//! - No STORED, BZIP2, LZMA, or other compression methods
//! - No modification timestamps (time/date fields are zero)

pub mod error;
mod structures;
mod writer;

pub use error::ZipError;
pub use structures::*;
pub use writer::{MAX_ENTRIES, ZipStreamWriter, validate_entry_name};
