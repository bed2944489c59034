use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;

use crate::collect::EntryOrder;
use crate::package::PackageConfig;

#[derive(Parser, Debug)]
#[command(name = "wgtpack")]
#[command(version)]
#[command(about = "Pack a built web app into a store-only .wgt archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  wgtpack                          pack ./dist and ./config.xml into ./app.wgt\n  \
  wgtpack -C mytv_frontend         same, relative to mytv_frontend/\n  \
  SOURCE_DATE_EPOCH=1700000000 wgtpack   reproducible timestamps")]
pub struct Cli {
    /// Project root that relative paths resolve against
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Directory to package
    #[arg(short = 's', long, value_name = "DIR", default_value = "dist")]
    pub source: PathBuf,

    /// File placed at the archive root
    #[arg(short = 'e', long, value_name = "FILE", default_value = "config.xml")]
    pub extra: PathBuf,

    /// Archive to write (replaced if it exists)
    #[arg(short = 'o', long, value_name = "FILE", default_value = "app.wgt")]
    pub output: PathBuf,

    /// Keep directory listing order instead of sorting by name
    #[arg(long)]
    pub listing_order: bool,

    /// Use this Unix time (UTC) for every entry instead of file mtimes
    #[arg(long, value_name = "SECONDS", env = "SOURCE_DATE_EPOCH")]
    pub source_date_epoch: Option<i64>,

    /// Verbose logging (-vv => more)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, errors only
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Log filter implied by `-q` and `-v`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn package_config(&self) -> Result<PackageConfig> {
        let pinned_mtime = match self.source_date_epoch {
            Some(secs) => Some(
                DateTime::from_timestamp(secs, 0)
                    .with_context(|| format!("Invalid source date epoch: {secs}"))?
                    .naive_utc(),
            ),
            None => None,
        };

        Ok(PackageConfig {
            source_dir: self.root.join(&self.source),
            extra_file: self.root.join(&self.extra),
            output: self.root.join(&self.output),
            order: if self.listing_order {
                EntryOrder::Listing
            } else {
                EntryOrder::Sorted
            },
            pinned_mtime,
        })
    }
}
