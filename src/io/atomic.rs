use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Output file that only appears at its destination once committed.
///
/// Bytes go to a temporary file in the destination's directory, so the final
/// rename stays on one filesystem. Dropping without [`commit`](Self::commit)
/// deletes the temporary file and leaves the destination untouched.
///
/// The committed file gets the permissions of the file it replaces, or the
/// usual create mode (`0o666` minus the umask) when there was none.
#[derive(Debug)]
pub struct AtomicFile {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl AtomicFile {
    pub fn create(destination: &Path) -> Result<Self> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".wgtpack-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // open(2) applies the umask to this mode
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let temp = builder
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        debug!(temp = ?temp.path(), destination = ?destination, "opened temporary output");

        Ok(Self {
            temp,
            destination: destination.to_path_buf(),
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Sync the temporary file and rename it over the destination,
    /// replacing any existing file there.
    pub fn commit(self) -> Result<PathBuf> {
        if let Ok(existing) = fs::metadata(&self.destination) {
            self.temp
                .as_file()
                .set_permissions(existing.permissions())
                .with_context(|| format!("Failed to copy permissions of {}", self.destination.display()))?;
        }
        self.temp
            .as_file()
            .sync_all()
            .context("Failed to sync archive to disk")?;
        let destination = self.destination;
        self.temp
            .persist(&destination)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move archive into place at {}", destination.display()))?;
        Ok(destination)
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}
