//! Compilation database generation.
//!
//! This module provides:
//! - Argument reconstruction for a single source file
//! - Graph walk with one entry per source (first module wins)
//! - JSON rendering and parsing of `compile_commands.json`
//! - Publishing to disk with an optional symlink
//!
//! # Architecture
//!
//! ```text
//! BuildGraph
//!     │
//!     ├── modules ──► EntryCollector ──► ArgumentBuilder (per source) ──► EntryTable
//!     │                                        │
//!     └── evaluator ◄──────────────────────────┘ expand_all (per flag)
//!
//! EntryTable ──► render ──► OutputSink (FilePublisher) ──► compile_commands.json
//! ```

mod builder;
mod collector;
mod entry;
mod pass;
mod publish;

pub use builder::{ArgumentBuilder, PLACEHOLDER_COMPILER, SourceFile, SourceKind};
pub use collector::{CollectStats, EntryCollector, EntryTable, collect_entries};
pub use entry::{CompilationDatabase, CompilationEntry, Format, render};
pub use pass::{GenerationPass, GenerationReport};
pub use publish::{FilePublisher, OutputSink, Published};
