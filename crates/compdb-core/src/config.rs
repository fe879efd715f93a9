//! Generation settings read from the environment.

use std::path::{Path, PathBuf};

use crate::compdb::Format;
use crate::paths::CompdbPaths;

/// Enables generation when truthy.
pub const ENV_GENERATE: &str = "GEN_COMPDB";

/// Selects indented output when truthy.
pub const ENV_DEBUG: &str = "GEN_COMPDB_DEBUG";

/// Directory to link the generated database into.
pub const ENV_LINK_TO: &str = "LINK_COMPDB_TO";

/// Configuration for a generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompdbConfig {
    /// Whether the pass runs at all
    pub enabled: bool,

    /// Indent the JSON for human inspection
    pub debug: bool,

    /// Publish directory for a `compile_commands.json` symlink
    pub link_dir: Option<PathBuf>,

    /// Override for the output directory.
    /// If None, the standard location under the source root is used.
    pub output_dir: Option<PathBuf>,
}

impl CompdbConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Each variable is read exactly once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup(ENV_GENERATE).is_some_and(|v| is_env_true(&v));
        let debug = lookup(ENV_DEBUG).is_some_and(|v| is_env_true(&v));
        let link_dir = lookup(ENV_LINK_TO)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            enabled,
            debug,
            link_dir,
            output_dir: None,
        }
    }

    /// An enabled configuration with default settings.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// JSON layout selected by `debug`.
    pub fn format(&self) -> Format {
        if self.debug {
            Format::Pretty
        } else {
            Format::Compact
        }
    }

    /// Output locations for a build rooted at `root`.
    pub fn paths_for(&self, root: &Path) -> CompdbPaths {
        match &self.output_dir {
            Some(dir) => CompdbPaths::in_dir(dir),
            None => CompdbPaths::for_root(root),
        }
    }
}

/// Whether an environment value counts as set.
pub fn is_env_true(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "on" | "true"
    )
}
