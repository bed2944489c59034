//! Enumeration of the files that make up a bundle.

use std::io;
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};
use tracing::trace;
use walkdir::WalkDir;

/// OS metadata files that never belong in a package, matched by exact name.
pub const IGNORED_FILE_NAMES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Order in which collected paths are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Siblings sorted by file name, for reproducible archives.
    #[default]
    Sorted,
    /// Whatever order the host's directory listing produces.
    Listing,
}

/// Check a bare file name against [`IGNORED_FILE_NAMES`].
///
/// # Arguments
///
/// * `file_name` - The last path component, without any directory
///
/// # Returns
///
/// `true` if the name exactly matches an OS metadata artifact.
pub fn is_ignored(file_name: &str) -> bool {
    IGNORED_FILE_NAMES.contains(&file_name)
}

/// Collect every regular file under `base` as a forward-slash path relative
/// to it.
///
/// Directories are traversed but not returned. Symlinks are neither followed
/// nor returned. An ignored name prunes a directory along with its contents.
///
/// # Arguments
///
/// * `base` - Directory to traverse
/// * `order` - Whether siblings are sorted by name or left in listing order
///
/// # Returns
///
/// Relative archive names, parents' files interleaved with their
/// subdirectories in traversal order.
///
/// # Errors
///
/// Returns an [`io::ErrorKind::NotFound`] error if `base` is not an existing
/// directory, and propagates any traversal error or non-UTF-8 name.
pub fn collect_files(base: &Path, order: EntryOrder) -> Result<Vec<String>> {
    if !base.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Directory not found: {}", base.display()),
        )
        .into());
    }

    // The base itself is depth 0 and never an entry
    let mut walker = WalkDir::new(base).min_depth(1).follow_links(false);
    if order == EntryOrder::Sorted {
        walker = walker.sort_by_file_name();
    }

    let mut files = Vec::new();
    let entries = walker
        .into_iter()
        .filter_entry(|e| !e.file_name().to_str().is_some_and(is_ignored));
    for entry in entries {
        // Traversal errors abort the collection
        let entry = entry.with_context(|| format!("Failed to read {}", base.display()))?;
        if !entry.file_type().is_file() {
            trace!(path = ?entry.path(), "skipping non-file");
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(base)
            .with_context(|| format!("{} is outside {}", entry.path().display(), base.display()))?;
        let name = archive_name(relative)?;
        trace!(%name, "collected");
        files.push(name);
    }

    Ok(files)
}

/// Join the components of a relative path with `/`.
///
/// # Arguments
///
/// * `relative` - Path relative to the collection base
///
/// # Returns
///
/// The archive name, independent of the host's separator. Non-UTF-8
/// components and anything other than plain names are an error.
fn archive_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => bail!("File name is not valid UTF-8: {}", relative.display()),
            },
            Component::CurDir => {}
            _ => bail!("Unexpected path component in {}", relative.display()),
        }
    }
    Ok(parts.join("/"))
}
