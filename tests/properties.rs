//! Property tests against reference implementations.

mod common;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use proptest::prelude::*;
use wgtpack::zip::crc32;
use wgtpack::{ArchiveEntry, ZipWriter};

use common::{pinned_time, read_directory, read_with_zip_crate};

fn write_archive(entries: &BTreeMap<String, Vec<u8>>, at: NaiveDateTime) -> Vec<u8> {
    let mut writer = ZipWriter::new(Vec::new());
    for (name, payload) in entries {
        writer
            .write_entry(&ArchiveEntry {
                name: name.clone(),
                payload: payload.clone(),
                last_modified: at,
            })
            .unwrap();
    }
    writer.finish().unwrap().0
}

proptest! {
    #[test]
    fn checksum_matches_crc32fast(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        prop_assert_eq!(crc32::checksum(&data), crc32fast::hash(&data));
    }

    #[test]
    fn incremental_matches_crc32fast(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        split in 0usize..2048,
    ) {
        let split = split.min(data.len());
        let mut crc = crc32::Crc32::new();
        crc.update(&data[..split]);
        crc.update(&data[split..]);
        prop_assert_eq!(crc.finalize(), crc32fast::hash(&data));
    }

    #[test]
    fn zip_reader_sees_what_was_written(
        entries in proptest::collection::btree_map(
            "[a-z0-9_]{1,8}(/[a-z0-9_.]{1,8}){0,2}",
            proptest::collection::vec(any::<u8>(), 0..512),
            1..12,
        )
    ) {
        let bytes = write_archive(&entries, pinned_time());

        let read = read_with_zip_crate(&bytes).unwrap();
        prop_assert_eq!(read.len(), entries.len());
        for ((name, data, crc), (expected_name, expected_data)) in read.iter().zip(&entries) {
            prop_assert_eq!(name, expected_name);
            prop_assert_eq!(data, expected_data);
            prop_assert_eq!(*crc, crc32fast::hash(expected_data));
        }

        for record in read_directory(&bytes).unwrap() {
            let at = record.local_header_offset as usize;
            prop_assert_eq!(&bytes[at..at + 4], b"PK\x03\x04");
        }
    }

    #[test]
    fn output_is_deterministic(
        entries in proptest::collection::btree_map(
            "[a-z]{1,6}",
            proptest::collection::vec(any::<u8>(), 0..64),
            0..6,
        )
    ) {
        prop_assert_eq!(
            write_archive(&entries, pinned_time()),
            write_archive(&entries, pinned_time())
        );
    }
}
