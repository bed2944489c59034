//! Packaging a build directory plus one root-level file into an archive.

use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, info};

use crate::collect::{EntryOrder, collect_files};
use crate::io::AtomicFile;
use crate::zip::{ArchiveEntry, ZipWriter};

/// Everything a packaging run needs to know.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    /// Directory whose files are stored with paths relative to it.
    pub source_dir: PathBuf,
    /// File stored at the archive root, after the tree.
    pub extra_file: PathBuf,
    pub output: PathBuf,
    pub order: EntryOrder,
    /// Timestamp applied to every entry instead of file modification times.
    pub pinned_mtime: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub entries: usize,
    pub archive_size: u64,
    pub output: PathBuf,
}

/// A file to read during the body phase, and its name in the archive.
struct PlannedEntry {
    name: String,
    path: PathBuf,
}

/// Build the archive described by `config`.
///
/// The source directory and extra file are checked before anything is
/// created. The archive is written to a temporary file next to the output
/// and renamed into place only once complete, so a failed run never leaves
/// a partial archive at `config.output`.
///
/// # Arguments
///
/// * `config` - Source, extra file, output and ordering options
///
/// # Returns
///
/// Entry count, archive size and the path of the committed archive.
///
/// # Errors
///
/// Returns a `NotFound` I/O error if the source directory or extra file is
/// missing. Any read or write failure after that aborts the whole run.
pub fn package(config: &PackageConfig) -> Result<PackageSummary> {
    // Preconditions: nothing on disk changes if these fail
    ensure_dir(&config.source_dir)?;
    ensure_file(&config.extra_file)?;

    let extra_name = config
        .extra_file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", config.extra_file.display()))?
        .to_string();

    // Tree entries first, then the extra file at the root
    info!(source = ?config.source_dir, order = ?config.order, "collecting files");
    let mut plan: Vec<PlannedEntry> = collect_files(&config.source_dir, config.order)?
        .into_iter()
        .map(|name| PlannedEntry {
            path: config.source_dir.join(&name),
            name,
        })
        .collect();
    plan.push(PlannedEntry {
        name: extra_name,
        path: config.extra_file.clone(),
    });
    info!(entries = plan.len(), "collected files");

    write_archive(&plan, config)
}

/// Write every planned entry to a fresh archive and move it into place.
///
/// # Arguments
///
/// * `plan` - Entries in archive order, each with the file to read
/// * `config` - Output path and timestamp options
///
/// # Returns
///
/// The summary of the committed archive. On error the temporary file is
/// dropped and `config.output` is left as it was.
fn write_archive(plan: &[PlannedEntry], config: &PackageConfig) -> Result<PackageSummary> {
    let file = AtomicFile::create(&config.output)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    // Body: one local header and payload per entry
    for planned in plan {
        let entry = read_entry(planned, config.pinned_mtime)?;
        writer.write_entry(&entry)?;
    }

    // Central directory and trailer, then flush the buffer into the file
    let (buffered, summary) = writer.finish()?;
    let file = buffered
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush archive")?;
    debug!(destination = ?file.destination(), "committing archive");
    let output = file.commit()?;

    info!(entries = summary.entries, bytes = summary.total_size, output = ?output, "archive written");
    Ok(PackageSummary {
        entries: summary.entries,
        archive_size: summary.total_size,
        output,
    })
}

/// Read one planned file into an [`ArchiveEntry`].
///
/// # Arguments
///
/// * `planned` - Archive name and the file backing it
/// * `pinned_mtime` - Timestamp to use instead of the file's mtime
///
/// # Returns
///
/// The entry with its full payload in memory, or an error naming the path
/// that could not be read.
fn read_entry(planned: &PlannedEntry, pinned_mtime: Option<NaiveDateTime>) -> Result<ArchiveEntry> {
    let payload = fs::read(&planned.path)
        .with_context(|| format!("Failed to read {}", planned.path.display()))?;

    let last_modified = match pinned_mtime {
        Some(mtime) => mtime,
        None => {
            // File mtimes are stored as local civil time
            let modified = fs::metadata(&planned.path)
                .and_then(|meta| meta.modified())
                .with_context(|| format!("Failed to read modification time of {}", planned.path.display()))?;
            DateTime::<Local>::from(modified).naive_local()
        }
    };

    Ok(ArchiveEntry {
        name: planned.name.clone(),
        payload,
        last_modified,
    })
}

/// Check that `path` is an existing directory.
///
/// # Returns
///
/// A `NotFound` I/O error naming the path otherwise.
fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("Directory not found: {}", path.display()),
    )
    .into())
}

/// Check that `path` is an existing regular file.
///
/// # Returns
///
/// A `NotFound` I/O error naming the path otherwise.
fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("File not found: {}", path.display()),
    )
    .into())
}
