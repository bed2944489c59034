//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::Result;
use byteorder::{LittleEndian, ReadBytesExt};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use wgtpack::{EntryOrder, PackageConfig};

pub fn pinned_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 20)
        .unwrap()
        .and_hms_opt(9, 30, 12)
        .unwrap()
}

/// Project layout with `dist/` and an optional `config.xml`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(files: &[(&str, &[u8])], config_xml: Option<&[u8]>) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("dist"))?;
        for (name, content) in files {
            let path = dir.path().join("dist").join(name);
            fs::create_dir_all(path.parent().unwrap())?;
            fs::write(path, content)?;
        }
        if let Some(content) = config_xml {
            fs::write(dir.path().join("config.xml"), content)?;
        }
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output(&self) -> std::path::PathBuf {
        self.root().join("app.wgt")
    }

    pub fn config(&self) -> PackageConfig {
        PackageConfig {
            source_dir: self.root().join("dist"),
            extra_file: self.root().join("config.xml"),
            output: self.output(),
            order: EntryOrder::Sorted,
            pinned_mtime: Some(pinned_time()),
        }
    }
}

/// Fields of the end of central directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

/// One central directory record as read back from raw bytes.
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    pub name: String,
    pub method: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub local_header_offset: u32,
}

pub fn read_trailer(bytes: &[u8]) -> Result<Trailer> {
    let eocd = &bytes[bytes.len() - 22..];
    assert_eq!(&eocd[..4], b"PK\x05\x06");
    let mut cursor = Cursor::new(&eocd[4..]);
    Ok(Trailer {
        disk_number: cursor.read_u16::<LittleEndian>()?,
        disk_with_cd: cursor.read_u16::<LittleEndian>()?,
        disk_entries: cursor.read_u16::<LittleEndian>()?,
        total_entries: cursor.read_u16::<LittleEndian>()?,
        cd_size: cursor.read_u32::<LittleEndian>()?,
        cd_offset: cursor.read_u32::<LittleEndian>()?,
        comment_len: cursor.read_u16::<LittleEndian>()?,
    })
}

pub fn read_directory(bytes: &[u8]) -> Result<Vec<DirectoryRecord>> {
    let trailer = read_trailer(bytes)?;
    let start = trailer.cd_offset as usize;
    let end = start + trailer.cd_size as usize;
    assert_eq!(end, bytes.len() - 22, "directory must end where the trailer starts");

    let mut cursor = Cursor::new(&bytes[start..end]);
    let mut records = Vec::new();
    for _ in 0..trailer.total_entries {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        assert_eq!(&sig, b"PK\x01\x02");
        let _made_by = cursor.read_u16::<LittleEndian>()?;
        let _needed = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        let method = cursor.read_u16::<LittleEndian>()?;
        let _time = cursor.read_u16::<LittleEndian>()?;
        let _date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let name_len = cursor.read_u16::<LittleEndian>()?;
        let extra_len = cursor.read_u16::<LittleEndian>()?;
        let comment_len = cursor.read_u16::<LittleEndian>()?;
        assert_eq!((extra_len, comment_len), (0, 0));
        let _disk = cursor.read_u16::<LittleEndian>()?;
        let _internal = cursor.read_u16::<LittleEndian>()?;
        let _external = cursor.read_u32::<LittleEndian>()?;
        let local_header_offset = cursor.read_u32::<LittleEndian>()?;
        let mut name = vec![0u8; name_len as usize];
        cursor.read_exact(&mut name)?;
        records.push(DirectoryRecord {
            name: String::from_utf8(name)?,
            method,
            crc32,
            compressed_size,
            uncompressed_size,
            local_header_offset,
        });
    }
    assert_eq!(cursor.position() as usize, end - start);
    Ok(records)
}

/// Read every entry back with the `zip` crate: (name, bytes, crc32).
pub fn read_with_zip_crate(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>, u32)>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        assert_eq!(file.compression(), zip::CompressionMethod::Stored);
        assert_eq!(file.size(), file.compressed_size());
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        entries.push((file.name().to_string(), data, file.crc32()));
    }
    Ok(entries)
}
