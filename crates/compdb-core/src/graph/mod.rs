//! Build graph interface.
//!
//! This module provides:
//! - The `BuildGraph` trait a generation pass queries
//! - Module and flag types
//! - A manifest-backed graph with dependency validation

mod manifest;
mod types;

pub use manifest::ManifestGraph;
pub use types::{BuildGraph, CompiledModule, FlagSet, Module, OtherKind, OtherModule};
