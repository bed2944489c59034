//! # wgtpack
//!
//! Packs a built web application into a widget archive (`.wgt`): a ZIP file
//! whose entries are all STORED, written from scratch without any
//! compression library or system `zip` binary.
//!
//! The archive contains every regular file of a build directory, with paths
//! relative to it, followed by one extra file (usually `config.xml`) at the
//! root.
//!
//! ## Features
//!
//! - Table-driven CRC-32 and DOS timestamp encoding
//! - Single-pass writer that never seeks, so any [`std::io::Write`] works
//! - Output written to a temporary file and renamed into place on success
//! - Sorted, reproducible entry order; optional pinned timestamps
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use wgtpack::{EntryOrder, PackageConfig, package};
//!
//! fn main() -> anyhow::Result<()> {
//!     let summary = package(&PackageConfig {
//!         source_dir: PathBuf::from("dist"),
//!         extra_file: PathBuf::from("config.xml"),
//!         output: PathBuf::from("app.wgt"),
//!         order: EntryOrder::Sorted,
//!         pinned_mtime: None,
//!     })?;
//!     println!("{} entries", summary.entries);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod collect;
pub mod io;
pub mod package;
pub mod zip;

pub use cli::Cli;
pub use collect::{EntryOrder, collect_files};
pub use package::{PackageConfig, PackageSummary, package};
pub use self::zip::{ArchiveEntry, ArchiveSummary, PendingRecord, ZipWriter};
