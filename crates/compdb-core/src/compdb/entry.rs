//! Compilation database entries and their JSON wire format.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// One compiled source file in a compilation database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationEntry {
    /// Absolute directory the compilation runs in
    pub directory: String,
    /// Full argument list, compiler first and source last
    pub arguments: Vec<String>,
    /// Source file; unique within a database
    pub file: String,
    /// Object file produced by the compilation, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Layout of the rendered JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Single line
    #[default]
    Compact,
    /// Indented with one space per level, for debugging
    Pretty,
}

/// Render entries as a JSON array.
///
/// Entries are written in the order given; callers pass them sorted for
/// reproducible output.
pub fn render(entries: &[CompilationEntry], format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Compact => Ok(serde_json::to_vec(entries)?),
        Format::Pretty => {
            let mut out = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
            entries.serialize(&mut serializer)?;
            Ok(out)
        }
    }
}

/// A parsed compilation database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationDatabase {
    entries: Vec<CompilationEntry>,
}

impl CompilationDatabase {
    pub fn new(entries: Vec<CompilationEntry>) -> Self {
        Self { entries }
    }

    /// Parse the JSON wire format.
    pub fn parse(json: &[u8]) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_slice(json)?))
    }

    /// Read and parse a `compile_commands.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::Database {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&bytes).map_err(|e| Error::Database {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Find the entry for a source file.
    pub fn entry(&self, file: &str) -> Option<&CompilationEntry> {
        self.entries.iter().find(|entry| entry.file == file)
    }

    pub fn entries(&self) -> &[CompilationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<CompilationEntry> {
        self.entries
    }
}
