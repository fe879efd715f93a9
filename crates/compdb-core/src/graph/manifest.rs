//! Resolved build graph loaded from a JSON manifest.
//!
//! The manifest is the hand-off format between a build system and compdb:
//! modules are already resolved, flags already collected. Loading only
//! checks that module references are consistent.
//!
//! ```json
//! {
//!   "root": "/src/project",
//!   "variables": { "CommonFlags": "-O2 -g" },
//!   "modules": [
//!     {
//!       "name": "libfoo",
//!       "srcs": ["foo/a.c", "foo/b.cpp"],
//!       "flags": { "global": ["$CommonFlags"], "cpp": ["-std=c++17"] },
//!       "deps": ["libbar"],
//!       "obj_dir": "out/obj/libfoo"
//!     },
//!     { "name": "libbar", "kind": "prebuilt" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::types::{BuildGraph, CompiledModule, FlagSet, Module, OtherKind, OtherModule};
use crate::error::{Error, Result};
use crate::expand::{MacroEvaluator, MacroScope};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    variables: FxHashMap<String, String>,
    #[serde(default)]
    modules: Vec<ModuleEntry>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModuleKind {
    #[default]
    Cc,
    Prebuilt,
    Genrule,
    Phony,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleEntry {
    name: String,
    #[serde(default)]
    kind: ModuleKind,
    #[serde(default)]
    srcs: Vec<PathBuf>,
    #[serde(default)]
    flags: FlagSet,
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    obj_dir: Option<PathBuf>,
}

impl ModuleEntry {
    fn into_module(self) -> Module {
        let kind = match self.kind {
            ModuleKind::Cc => {
                return Module::Compiled(CompiledModule {
                    name: self.name,
                    srcs: self.srcs,
                    flags: self.flags,
                    obj_dir: self.obj_dir,
                });
            }
            ModuleKind::Prebuilt => OtherKind::Prebuilt,
            ModuleKind::Genrule => OtherKind::Genrule,
            ModuleKind::Phony => OtherKind::Phony,
        };
        Module::Other(OtherModule {
            name: self.name,
            kind,
        })
    }
}

/// A build graph backed by a manifest.
///
/// Modules are visited in declaration order.
#[derive(Debug, Clone)]
pub struct ManifestGraph {
    root: PathBuf,
    scope: MacroScope,
    modules: Vec<Module>,
}

impl ManifestGraph {
    /// Build a graph directly from its parts.
    pub fn new(root: impl Into<PathBuf>, scope: MacroScope, modules: Vec<Module>) -> Self {
        Self {
            root: root.into(),
            scope,
            modules,
        }
    }

    /// Load a manifest file.
    ///
    /// A relative or missing `root` resolves against the manifest's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::parse(&source, path, base_dir)
    }

    /// Parse manifest JSON, resolving a relative `root` against the current directory.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json, Path::new("<inline>"), Path::new("."))
    }

    fn parse(json: &str, origin: &Path, base_dir: &Path) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json).map_err(|e| Error::Manifest {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        validate_modules(&manifest.modules)?;

        let root = match manifest.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => base_dir.join(root),
            None => base_dir.to_path_buf(),
        };
        let scope = manifest.variables.into_iter().collect();
        let modules = manifest
            .modules
            .into_iter()
            .map(ModuleEntry::into_module)
            .collect::<Vec<_>>();

        tracing::debug!(
            manifest = %origin.display(),
            modules = modules.len(),
            "loaded build graph manifest"
        );

        Ok(Self::new(root, scope, modules))
    }

    /// Replace the source root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Root directory as declared (possibly relative).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Variables flags are evaluated against.
    pub fn scope(&self) -> &MacroScope {
        &self.scope
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl BuildGraph for ManifestGraph {
    fn modules(&self) -> &[Module] {
        &self.modules
    }

    fn evaluator(&self) -> &dyn MacroEvaluator {
        &self.scope
    }

    fn source_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }
}

/// Check names are unique, deps resolve, and the dependency graph is acyclic.
fn validate_modules(modules: &[ModuleEntry]) -> Result<()> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut node_indices: FxHashMap<&str, NodeIndex> = FxHashMap::default();

    for module in modules {
        if node_indices.contains_key(module.name.as_str()) {
            return Err(Error::DuplicateModule(module.name.clone()));
        }
        let idx = graph.add_node(module.name.as_str());
        node_indices.insert(module.name.as_str(), idx);
    }

    // Edges go from dependency to dependent
    for module in modules {
        let consumer = node_indices[module.name.as_str()];
        for dep in &module.deps {
            let Some(&producer) = node_indices.get(dep.as_str()) else {
                return Err(Error::ModuleNotFound(format!(
                    "module '{}' depends on '{}', which is not defined",
                    module.name, dep
                )));
            };
            graph.add_edge(producer, consumer, ());
        }
    }

    detect_cycles(&graph)
}

fn detect_cycles(graph: &DiGraph<&str, ()>) -> Result<()> {
    use petgraph::algo::kosaraju_scc;

    for scc in kosaraju_scc(graph) {
        let self_loop = scc.len() == 1 && graph.contains_edge(scc[0], scc[0]);
        if scc.len() > 1 || self_loop {
            let names: Vec<&str> = scc.iter().map(|&idx| graph[idx]).collect();
            return Err(Error::CyclicDependency(format!(
                "{} → {}",
                names.join(" → "),
                names[0]
            )));
        }
    }

    Ok(())
}
