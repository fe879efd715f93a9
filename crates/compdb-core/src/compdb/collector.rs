//! Graph walk that collects one entry per compiled source.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::builder::{ArgumentBuilder, SourceFile};
use super::entry::CompilationEntry;
use crate::error::{Error, Result};
use crate::graph::{BuildGraph, CompiledModule};

/// Entries keyed by source path.
///
/// The first entry inserted for a path is kept; later ones are ignored.
#[derive(Debug, Default)]
pub struct EntryTable {
    entries: FxHashMap<String, CompilationEntry>,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` unless its file already has one. Returns whether it was inserted.
    pub fn insert_first(&mut self, entry: CompilationEntry) -> bool {
        use std::collections::hash_map::Entry;

        match self.entries.entry(entry.file.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn contains(&self, file: &str) -> bool {
        self.entries.contains_key(file)
    }

    pub fn get(&self, file: &str) -> Option<&CompilationEntry> {
        self.entries.get(file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by file path.
    pub fn into_sorted_entries(self) -> Vec<CompilationEntry> {
        let mut entries: Vec<_> = self.entries.into_values().collect();
        entries.sort_by(|a, b| a.file.cmp(&b.file));
        entries
    }
}

/// Counters from one graph walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Modules visited, compiled or not
    pub modules_visited: usize,
    /// Modules with at least one compiled source
    pub compiled_modules: usize,
    /// Sources skipped because an earlier module already produced their entry
    pub duplicates_skipped: usize,
}

/// Walks a build graph and builds the entry table.
pub struct EntryCollector<'g, G: BuildGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: BuildGraph + ?Sized> EntryCollector<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Visit every module and collect entries for its sources.
    pub fn collect(&self) -> Result<(EntryTable, CollectStats)> {
        let directory = self.absolute_root()?;
        let builder = ArgumentBuilder::new(self.graph.evaluator());

        let mut table = EntryTable::new();
        let mut stats = CollectStats::default();

        for module in self.graph.modules() {
            stats.modules_visited += 1;

            let Some(compiled) = module.as_compiled() else {
                tracing::trace!(module = module.name(), "skipping module without compiled sources");
                continue;
            };
            if compiled.srcs.is_empty() {
                continue;
            }

            stats.compiled_modules += 1;
            stats.duplicates_skipped += collect_module(compiled, &builder, &directory, &mut table);
        }

        tracing::debug!(
            entries = table.len(),
            modules = stats.modules_visited,
            duplicates = stats.duplicates_skipped,
            "collected compilation entries"
        );

        Ok((table, stats))
    }

    /// The source root as an absolute path string, shared by every entry.
    fn absolute_root(&self) -> Result<String> {
        let root = self.graph.source_root()?;
        let absolute = std::path::absolute(&root).map_err(|source| Error::SourceRoot {
            path: root.clone(),
            source,
        })?;
        Ok(absolute.to_string_lossy().into_owned())
    }
}

/// Add entries for one module's sources. Returns how many were already present.
fn collect_module(
    module: &CompiledModule,
    builder: &ArgumentBuilder<'_>,
    directory: &str,
    table: &mut EntryTable,
) -> usize {
    let mut duplicates = 0;

    for src in &module.srcs {
        let file = src.to_string_lossy();
        if table.contains(&file) {
            tracing::trace!(module = %module.name, file = %file, "source already has an entry");
            duplicates += 1;
            continue;
        }

        let source = SourceFile::classify(src.clone());
        let entry = CompilationEntry {
            directory: directory.to_string(),
            arguments: builder.build(&source, &module.flags),
            file: source.display_path(),
            output: module
                .object_path(src)
                .map(|path: PathBuf| path.to_string_lossy().into_owned()),
        };
        table.insert_first(entry);
    }

    duplicates
}

/// Collect entries from every module of `graph`, sorted by file.
pub fn collect_entries<G: BuildGraph + ?Sized>(graph: &G) -> Result<Vec<CompilationEntry>> {
    let (table, _) = EntryCollector::new(graph).collect()?;
    Ok(table.into_sorted_entries())
}
