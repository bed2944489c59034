use byteorder::{LittleEndian, WriteBytesExt};
use chrono::NaiveDateTime;
use std::io::{self, Write};

use super::dos_time::DosDateTime;

/// Version 2.0: the minimum for plain stored entries.
pub const VERSION: u16 = 20;

/// Compression method 0: payload embedded verbatim.
pub const METHOD_STORED: u16 = 0;

/// Local File Header (LFH) - 30 bytes before the name
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Central Directory File Header (CDFH) - 46 bytes before the name
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// A file to be stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Forward-slash path relative to the archive root.
    pub name: String,
    pub payload: Vec<u8>,
    pub last_modified: NaiveDateTime,
}

/// Bookkeeping for an entry whose local header and payload are already
/// written, kept until its central directory record is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub name: String,
    pub crc32: u32,
    /// Compressed and uncompressed size (identical for stored entries).
    pub size: u32,
    pub local_header_offset: u32,
    pub modified: DosDateTime,
}

/// Header that immediately precedes an entry's payload in the archive body.
#[derive(Debug, Clone, Copy)]
pub struct LocalFileHeader<'a> {
    pub file_name: &'a str,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub size: u32,
}

impl LocalFileHeader<'_> {
    /// Encoded length, name included.
    pub fn len(&self) -> usize {
        LFH_SIZE + self.file_name.len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(LFH_SIGNATURE)?;
        writer.write_u16::<LittleEndian>(VERSION)?; // version needed
        writer.write_u16::<LittleEndian>(0)?; // flags
        writer.write_u16::<LittleEndian>(METHOD_STORED)?;
        writer.write_u16::<LittleEndian>(self.modified.time)?;
        writer.write_u16::<LittleEndian>(self.modified.date)?;
        writer.write_u32::<LittleEndian>(self.crc32)?;
        writer.write_u32::<LittleEndian>(self.size)?; // compressed
        writer.write_u32::<LittleEndian>(self.size)?; // uncompressed
        writer.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        writer.write_u16::<LittleEndian>(0)?; // extra field length
        writer.write_all(self.file_name.as_bytes())
    }
}

/// Directory record describing one entry already present in the body.
#[derive(Debug, Clone, Copy)]
pub struct CentralDirectoryHeader<'a> {
    pub record: &'a PendingRecord,
}

impl CentralDirectoryHeader<'_> {
    pub fn len(&self) -> usize {
        CDFH_MIN_SIZE + self.record.name.len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let record = self.record;
        writer.write_all(CDFH_SIGNATURE)?;
        writer.write_u16::<LittleEndian>(VERSION)?; // version made by
        writer.write_u16::<LittleEndian>(VERSION)?; // version needed
        writer.write_u16::<LittleEndian>(0)?; // flags
        writer.write_u16::<LittleEndian>(METHOD_STORED)?;
        writer.write_u16::<LittleEndian>(record.modified.time)?;
        writer.write_u16::<LittleEndian>(record.modified.date)?;
        writer.write_u32::<LittleEndian>(record.crc32)?;
        writer.write_u32::<LittleEndian>(record.size)?; // compressed
        writer.write_u32::<LittleEndian>(record.size)?; // uncompressed
        writer.write_u16::<LittleEndian>(record.name.len() as u16)?;
        writer.write_u16::<LittleEndian>(0)?; // extra field length
        writer.write_u16::<LittleEndian>(0)?; // file comment length
        writer.write_u16::<LittleEndian>(0)?; // disk number start
        writer.write_u16::<LittleEndian>(0)?; // internal attributes
        writer.write_u32::<LittleEndian>(0)?; // external attributes
        writer.write_u32::<LittleEndian>(record.local_header_offset)?;
        writer.write_all(record.name.as_bytes())
    }
}

/// End of Central Directory (EOCD) - 22 bytes, no comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Trailer for a single-disk archive without a comment.
    pub fn new(entries: u16, cd_size: u32, cd_offset: u32) -> Self {
        Self {
            disk_number: 0,
            disk_with_cd: 0,
            disk_entries: entries,
            total_entries: entries,
            cd_size,
            cd_offset,
            comment_len: 0,
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(Self::SIGNATURE)?;
        writer.write_u16::<LittleEndian>(self.disk_number)?;
        writer.write_u16::<LittleEndian>(self.disk_with_cd)?;
        writer.write_u16::<LittleEndian>(self.disk_entries)?;
        writer.write_u16::<LittleEndian>(self.total_entries)?;
        writer.write_u32::<LittleEndian>(self.cd_size)?;
        writer.write_u32::<LittleEndian>(self.cd_offset)?;
        writer.write_u16::<LittleEndian>(self.comment_len)
    }
}
