//! The generation pass: walk, render, publish.

use std::path::PathBuf;

use super::collector::EntryCollector;
use super::entry::render;
use super::publish::OutputSink;
use crate::config::CompdbConfig;
use crate::error::Result;
use crate::graph::BuildGraph;

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Canonical location of the database
    pub output_path: PathBuf,
    /// Symlink placed for the database, if any
    pub link_path: Option<PathBuf>,
    /// Number of entries written
    pub entries: usize,
    /// Modules visited during the walk
    pub modules_visited: usize,
    /// Modules that contributed compiled sources
    pub compiled_modules: usize,
    /// Sources skipped because an earlier module already covered them
    pub duplicates_skipped: usize,
}

/// One compilation database generation over a resolved build graph.
///
/// Construct, [`run`](Self::run) once, discard.
pub struct GenerationPass<'g, G: BuildGraph + ?Sized, S: OutputSink> {
    graph: &'g G,
    sink: S,
    config: CompdbConfig,
}

impl<'g, G: BuildGraph + ?Sized, S: OutputSink> GenerationPass<'g, G, S> {
    pub fn new(graph: &'g G, sink: S, config: CompdbConfig) -> Self {
        Self {
            graph,
            sink,
            config,
        }
    }

    /// Run the pass.
    ///
    /// Returns `Ok(None)` without touching the graph or the sink when the
    /// configuration is disabled. Nothing is published unless the whole walk
    /// succeeds.
    pub fn run(mut self) -> Result<Option<GenerationReport>> {
        if !self.config.enabled {
            tracing::debug!("compilation database generation is disabled");
            return Ok(None);
        }

        let (table, stats) = EntryCollector::new(self.graph).collect()?;
        let entries = table.into_sorted_entries();
        let contents = render(&entries, self.config.format())?;
        let published = self.sink.publish(&contents)?;

        tracing::info!(
            "Wrote {} entries from {} modules to {}",
            entries.len(),
            stats.compiled_modules,
            published.output_path.display()
        );

        Ok(Some(GenerationReport {
            output_path: published.output_path,
            link_path: published.link_path,
            entries: entries.len(),
            modules_visited: stats.modules_visited,
            compiled_modules: stats.compiled_modules,
            duplicates_skipped: stats.duplicates_skipped,
        }))
    }
}
