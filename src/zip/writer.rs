use std::collections::HashSet;
use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::io::CountingWriter;

use super::crc32;
use super::dos_time::DosDateTime;
use super::structures::*;

/// Most entries a non-Zip64 trailer can count.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// Totals reported once the archive is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub entries: usize,
    pub central_directory_offset: u32,
    pub central_directory_size: u32,
    /// Length of the whole archive in bytes.
    pub total_size: u64,
}

/// Single-pass writer for store-only ZIP archives.
///
/// Writing happens in three phases that never overlap:
///
/// 1. Body: each [`write_entry`](Self::write_entry) call appends a local file
///    header and the payload, and remembers where the header started.
/// 2. Central directory: [`finish`](Self::finish) emits one record per entry,
///    in the order they were written.
/// 3. Trailer: `finish` then writes the end of central directory record.
///
/// Every offset the directory needs is known before it is written, so the
/// output never has to be seekable.
///
/// ## Example
///
/// ```
/// use chrono::NaiveDate;
/// use wgtpack::{ArchiveEntry, ZipWriter};
///
/// let mut writer = ZipWriter::new(Vec::new());
/// writer.write_entry(&ArchiveEntry {
///     name: "config.xml".to_string(),
///     payload: b"<x/>".to_vec(),
///     last_modified: NaiveDate::from_ymd_opt(2024, 1, 1)
///         .unwrap()
///         .and_hms_opt(0, 0, 0)
///         .unwrap(),
/// })?;
/// let (bytes, summary) = writer.finish()?;
/// assert_eq!(summary.entries, 1);
/// assert_eq!(bytes.len() as u64, summary.total_size);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct ZipWriter<W: Write> {
    /// Output with the running byte cursor
    sink: CountingWriter<W>,
    /// One record per entry already in the body, in write order
    records: Vec<PendingRecord>,
    names: HashSet<String>,
}

impl<W: Write> ZipWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            sink: CountingWriter::new(inner),
            records: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Current byte offset, i.e. where the next header will start.
    pub fn position(&self) -> u64 {
        self.sink.position()
    }

    /// Entries written so far.
    pub fn records(&self) -> &[PendingRecord] {
        &self.records
    }

    /// Append one entry's local header and payload to the body.
    ///
    /// # Errors
    ///
    /// Fails on an invalid or duplicate name, a timestamp outside the DOS
    /// range, a payload or offset that does not fit in 32 bits, too many
    /// entries, or any write error. The writer should be discarded after
    /// an error: bytes already written are not rolled back.
    pub fn write_entry(&mut self, entry: &ArchiveEntry) -> Result<&PendingRecord> {
        let name = entry.name.as_str();
        validate_name(name)?;
        if self.names.contains(name) {
            bail!("Duplicate entry name: {name}");
        }
        if self.records.len() >= MAX_ENTRIES {
            bail!("Too many entries: the format holds at most {MAX_ENTRIES} without Zip64");
        }

        let local_header_offset = u32::try_from(self.sink.position())
            .with_context(|| format!("Archive exceeds 4 GiB before {name} (Zip64 is not supported)"))?;
        let size = u32::try_from(entry.payload.len())
            .with_context(|| format!("{name} is larger than 4 GiB (Zip64 is not supported)"))?;
        let modified = DosDateTime::from_datetime(&entry.last_modified)
            .with_context(|| format!("Invalid modification time for {name}"))?;
        let crc32 = crc32::checksum(&entry.payload);

        let header = LocalFileHeader {
            file_name: name,
            modified,
            crc32,
            size,
        };
        header
            .write_to(&mut self.sink)
            .with_context(|| format!("Failed to write local header for {name}"))?;
        self.sink
            .write_all(&entry.payload)
            .with_context(|| format!("Failed to write data for {name}"))?;

        debug_assert_eq!(
            self.sink.position(),
            local_header_offset as u64 + header.len() as u64 + size as u64
        );
        debug!(name, offset = local_header_offset, size, crc32, %modified, "wrote entry");

        self.names.insert(entry.name.clone());
        self.records.push(PendingRecord {
            name: entry.name.clone(),
            crc32,
            size,
            local_header_offset,
            modified,
        });
        Ok(&self.records[self.records.len() - 1])
    }

    /// Write the central directory and trailer, flush, and hand back the
    /// inner writer.
    pub fn finish(mut self) -> Result<(W, ArchiveSummary)> {
        let cd_start = self.sink.position();
        let central_directory_offset = u32::try_from(cd_start)
            .context("Archive body exceeds 4 GiB (Zip64 is not supported)")?;
        info!(
            entries = self.records.len(),
            offset = central_directory_offset,
            "writing central directory"
        );

        for record in &self.records {
            CentralDirectoryHeader { record }
                .write_to(&mut self.sink)
                .with_context(|| format!("Failed to write directory record for {}", record.name))?;
        }

        let central_directory_size = u32::try_from(self.sink.position() - cd_start)
            .context("Central directory exceeds 4 GiB (Zip64 is not supported)")?;

        // Entry count was bounded by write_entry.
        let eocd = EndOfCentralDirectory::new(
            self.records.len() as u16,
            central_directory_size,
            central_directory_offset,
        );
        eocd.write_to(&mut self.sink)
            .context("Failed to write end of central directory")?;
        self.sink.flush().context("Failed to flush archive")?;

        let summary = ArchiveSummary {
            entries: self.records.len(),
            central_directory_offset,
            central_directory_size,
            total_size: self.sink.position(),
        };
        debug!(?summary, "archive complete");
        Ok((self.sink.into_inner(), summary))
    }
}

/// Check an entry name against what the local and central headers can hold.
///
/// # Arguments
///
/// * `name` - The archive path of the entry
///
/// # Returns
///
/// An error if the name is empty, contains a backslash, or is longer than
/// the 16-bit name length field allows.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Entry name must not be empty");
    }
    if name.contains('\\') {
        bail!("Entry name must use forward slashes: {name}");
    }
    if name.len() > u16::MAX as usize {
        bail!("Entry name is longer than {} bytes: {name}", u16::MAX);
    }
    Ok(())
}
