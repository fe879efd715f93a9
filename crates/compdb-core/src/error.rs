//! Error types for compdb-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for compdb-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a generation pass.
///
/// Per-token expansion failures and unrecognized source extensions are
/// recovered inside the pass and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// The output directory or file could not be created or written.
    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The publish link could not be replaced.
    #[error("unable to symlink {} to {}: {source}", .target.display(), .link.display())]
    Link {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry table could not be rendered.
    #[error("failed to serialize compilation database: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The absolute source root could not be resolved.
    #[error("cannot resolve source root {}: {source}", .path.display())]
    SourceRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A build graph manifest could not be read or parsed.
    #[error("invalid build graph manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    /// Two modules in a manifest share a name.
    #[error("duplicate module: {0}")]
    DuplicateModule(String),

    /// A module depends on a module that is not in the graph.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The module dependency graph contains a cycle.
    #[error("cyclic dependency detected: {0}")]
    CyclicDependency(String),

    /// An existing compilation database could not be read or parsed.
    #[error("invalid compilation database {}: {message}", .path.display())]
    Database { path: PathBuf, message: String },
}

impl Error {
    /// Render the error together with a recovery hint, if one applies.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::Output { .. } => {
                Some("check that the output directory is writable, or pass --output-dir")
            }
            Self::Link { .. } => Some("check that LINK_COMPDB_TO names an existing directory"),
            Self::SourceRoot { .. } => Some("pass --root with an existing source directory"),
            Self::ModuleNotFound(_) => Some("every entry in `deps` must name a module in the manifest"),
            Self::CyclicDependency(_) => Some("remove one of the `deps` edges listed above"),
            Self::DuplicateModule(_) => Some("module names must be unique within a manifest"),
            Self::Serialization(_)
            | Self::Manifest { .. }
            | Self::Database { .. } => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}
