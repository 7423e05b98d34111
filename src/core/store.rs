//! Store handle for yinian's persisted state.
//!
//! All engine state (daily draw, collection, preferences) lives under a single
//! data directory. The default root is `~/.yinian/data`; tests and the CLI's
//! `--dir` flag point it elsewhere.

use crate::core::error::YinianError;
use std::path::{Path, PathBuf};

/// Logical container for yinian's state database.
#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute path to the store root directory.
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the store root: explicit `--dir` wins, otherwise `~/.yinian/data`.
    ///
    /// The directory is created if missing so that a first run needs no init step.
    pub fn resolve(dir: Option<PathBuf>) -> Result<Self, YinianError> {
        let root = match dir {
            Some(d) => d,
            None => {
                let home = std::env::var_os("HOME").ok_or_else(|| {
                    YinianError::PathError(
                        "HOME is not set; pass --dir to choose a data directory".to_string(),
                    )
                })?;
                Path::new(&home).join(".yinian").join("data")
            }
        };
        std::fs::create_dir_all(&root).map_err(YinianError::IoError)?;
        Ok(Self { root })
    }
}
