//! Compilation database output locations.
//!
//! The database is written to a fixed location under the source root so
//! tools can find it without configuration:
//!
//! ```text
//! <root>/
//! └── out/development/ide/compdb/
//!     └── compile_commands.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name of the database, both at its canonical location and at the link.
pub const COMPDB_FILENAME: &str = "compile_commands.json";

/// Output directory relative to the source root.
pub const COMPDB_OUTPUT_DIR: &str = "out/development/ide/compdb";

/// Where a generated database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompdbPaths {
    /// Directory holding the database.
    pub output_dir: PathBuf,

    /// The database file itself.
    pub output_file: PathBuf,
}

impl CompdbPaths {
    /// Standard location under a source root.
    pub fn for_root(root: &Path) -> Self {
        Self::in_dir(root.join(COMPDB_OUTPUT_DIR))
    }

    /// Database directly inside `output_dir`.
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let output_file = output_dir.join(COMPDB_FILENAME);
        Self {
            output_dir,
            output_file,
        }
    }

    /// Create the output directory and its parents if they don't exist.
    ///
    /// # Errors
    /// Returns `Error::Output` naming the directory if creation fails.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|source| Error::Output {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Link location inside a publish directory.
    pub fn link_path(link_dir: &Path) -> PathBuf {
        link_dir.join(COMPDB_FILENAME)
    }
}
