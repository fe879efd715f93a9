//! Generate command implementation for compdb CLI.
//!
//! Loads a build graph manifest and writes compile_commands.json.

use std::path::{Path, PathBuf};
use std::time::Instant;

use compdb_core::config::ENV_GENERATE;
use compdb_core::{CompdbConfig, ManifestGraph};

use crate::colors;

/// Command-line overrides for the environment configuration.
pub struct GenerateOptions {
    pub root: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub link_to: Option<PathBuf>,
    pub debug: bool,
    pub force: bool,
}

impl GenerateOptions {
    /// Layer the flags over the environment configuration.
    fn apply(self, mut config: CompdbConfig) -> CompdbConfig {
        config.enabled |= self.force;
        config.debug |= self.debug;
        if self.link_to.is_some() {
            config.link_dir = self.link_to;
        }
        config.output_dir = self.output_dir;
        config
    }
}

/// Execute the generate command.
pub fn execute(manifest_path: &Path, options: GenerateOptions) -> anyhow::Result<()> {
    let root = options.root.clone();
    let config = options.apply(CompdbConfig::from_env());

    if !config.enabled {
        println!(
            "{}Compilation database generation is disabled.{} Set {}=1 or pass --force.",
            colors::YELLOW,
            colors::RESET,
            ENV_GENERATE
        );
        return Ok(());
    }

    if !manifest_path.exists() {
        anyhow::bail!("Manifest not found: {}", manifest_path.display());
    }

    let start = Instant::now();

    let mut graph = ManifestGraph::from_path(manifest_path)?;
    if let Some(root) = root {
        graph = graph.with_root(root);
    }

    let Some(report) = compdb_core::generate(&graph, config)? else {
        return Ok(());
    };

    println!(
        "{}Generated{} {} entries from {} modules in {:.2}ms",
        colors::GREEN,
        colors::RESET,
        report.entries,
        report.compiled_modules,
        start.elapsed().as_secs_f64() * 1000.0
    );
    if report.duplicates_skipped > 0 {
        println!(
            "  {}{} duplicate sources skipped{}",
            colors::DIM,
            report.duplicates_skipped,
            colors::RESET
        );
    }
    println!("  {}", report.output_path.display());
    if let Some(link) = &report.link_path {
        println!("  {}linked{} {}", colors::CYAN, colors::RESET, link.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GenerateOptions {
        GenerateOptions {
            root: None,
            output_dir: None,
            link_to: None,
            debug: false,
            force: false,
        }
    }

    #[test]
    fn test_force_enables() {
        let config = GenerateOptions {
            force: true,
            ..options()
        }
        .apply(CompdbConfig::default());
        assert!(config.enabled);
    }

    #[test]
    fn test_flags_override_environment() {
        let env = CompdbConfig {
            enabled: true,
            debug: false,
            link_dir: Some(PathBuf::from("/env/link")),
            output_dir: None,
        };
        let config = GenerateOptions {
            link_to: Some(PathBuf::from("/flag/link")),
            output_dir: Some(PathBuf::from("/flag/out")),
            debug: true,
            ..options()
        }
        .apply(env);

        assert!(config.debug);
        assert_eq!(config.link_dir, Some(PathBuf::from("/flag/link")));
        assert_eq!(config.output_dir, Some(PathBuf::from("/flag/out")));
    }

    #[test]
    fn test_environment_link_kept_without_flag() {
        let env = CompdbConfig {
            link_dir: Some(PathBuf::from("/env/link")),
            ..CompdbConfig::enabled()
        };
        let config = options().apply(env);
        assert_eq!(config.link_dir, Some(PathBuf::from("/env/link")));
    }
}
