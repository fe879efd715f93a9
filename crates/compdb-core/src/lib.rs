//! Core engine for compilation database generation.
//!
//! This crate provides:
//! - Build graph interface and a manifest-backed implementation
//! - Macro expansion for raw compiler flags
//! - Argument reconstruction and per-source deduplication
//! - `compile_commands.json` rendering and publishing
//! - Environment-driven configuration

pub mod compdb;
pub mod config;
pub mod error;
pub mod expand;
pub mod graph;
pub mod paths;

pub use compdb::{
    ArgumentBuilder, CompilationDatabase, CompilationEntry, EntryCollector, EntryTable,
    FilePublisher, Format, GenerationPass, GenerationReport, OutputSink, PLACEHOLDER_COMPILER,
    Published, SourceFile, SourceKind, collect_entries, render,
};
pub use config::CompdbConfig;
pub use error::{Error, Result};
pub use expand::{ExpansionError, MacroEvaluator, MacroScope, expand_all};
pub use graph::{BuildGraph, CompiledModule, FlagSet, ManifestGraph, Module, OtherKind, OtherModule};
pub use paths::CompdbPaths;

/// Generate a database for `graph` at the standard location, if enabled.
///
/// Uses `config` for activation, formatting and linking; the output
/// directory defaults to `out/development/ide/compdb` under the graph's
/// absolute source root.
pub fn generate<G: BuildGraph + ?Sized>(
    graph: &G,
    config: CompdbConfig,
) -> Result<Option<GenerationReport>> {
    if !config.enabled {
        return Ok(None);
    }

    let root = graph.source_root()?;
    let root = std::path::absolute(&root).map_err(|source| Error::SourceRoot {
        path: root.clone(),
        source,
    })?;
    let publisher = FilePublisher::new(config.paths_for(&root)).with_link_dir(config.link_dir.clone());

    GenerationPass::new(graph, publisher, config).run()
}
