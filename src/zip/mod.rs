//! Store-only ZIP archive writing.
//!
//! ## Architecture
//!
//! - [`crc32`]: table-driven CRC-32 used for every entry
//! - [`dos_time`]: calendar time to the 16-bit DOS date/time fields
//! - [`structures`]: byte layout of the three record types
//! - [`writer`]: the single-pass [`ZipWriter`] that ties them together
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers, each followed by that file's data
//! 2. Central Directory with one record per file, pointing back at its header
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Limitations
//!
//! - Entries are always STORED; there is no compression
//! - No encryption, no multi-disk archives
//! - No ZIP64: offsets and sizes are 32-bit, at most 65535 entries

pub mod crc32;
pub mod dos_time;
mod structures;
mod writer;

pub use dos_time::DosDateTime;
pub use structures::*;
pub use writer::{ArchiveSummary, MAX_ENTRIES, ZipWriter};
