//! Types for the resolved build graph.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expand::MacroEvaluator;

/// Raw compiler flags of one module, grouped by purpose.
///
/// Flags are unevaluated and may contain variable references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlagSet {
    /// Flags passed to every compilation
    pub global: Vec<String>,
    /// Flags passed to C, C++ and assembly compilations alike
    pub c: Vec<String>,
    /// Flags passed to C++ compilations only
    pub cpp: Vec<String>,
    /// Flags passed to C compilations only
    pub conly: Vec<String>,
    /// System include flags (`-isystem ...`)
    pub system_include: Vec<String>,
}

/// Kind of a module that does not compile sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherKind {
    /// Prebuilt library or binary
    Prebuilt,
    /// Generated sources or headers
    Genrule,
    /// Target that only groups other targets
    Phony,
}

/// A module that owns compiled sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    /// Module name
    pub name: String,
    /// Sources in declaration order
    pub srcs: Vec<PathBuf>,
    /// Raw flags
    pub flags: FlagSet,
    /// Directory object files are written to, if known
    pub obj_dir: Option<PathBuf>,
}

impl CompiledModule {
    pub fn new(name: impl Into<String>, srcs: Vec<PathBuf>, flags: FlagSet) -> Self {
        Self {
            name: name.into(),
            srcs,
            flags,
            obj_dir: None,
        }
    }

    /// Set the object directory used to derive entry outputs.
    pub fn with_obj_dir(mut self, obj_dir: impl Into<PathBuf>) -> Self {
        self.obj_dir = Some(obj_dir.into());
        self
    }

    /// Object file path for one of this module's sources.
    ///
    /// `<obj_dir>/<src>` with the extension replaced by `o`. The result always
    /// stays inside `obj_dir`: roots are dropped from absolute sources and
    /// `..` cancels a preceding component or is discarded.
    pub fn object_path(&self, src: &Path) -> Option<PathBuf> {
        self.obj_dir
            .as_ref()
            .map(|dir| dir.join(contained(src)).with_extension("o"))
    }
}

/// `path` reduced to normal components, so joining it cannot leave the base.
fn contained(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                out.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }
    out
}

/// A module with no compiled sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherModule {
    pub name: String,
    pub kind: OtherKind,
}

/// One buildable target in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Module {
    /// Owns sources that are compiled with flags
    Compiled(CompiledModule),
    /// Anything else (prebuilt, generated, phony)
    Other(OtherModule),
}

impl Module {
    pub fn name(&self) -> &str {
        match self {
            Self::Compiled(module) => &module.name,
            Self::Other(module) => &module.name,
        }
    }

    /// The compiled-sources capability, if this module has it.
    pub fn as_compiled(&self) -> Option<&CompiledModule> {
        match self {
            Self::Compiled(module) => Some(module),
            Self::Other(_) => None,
        }
    }
}

impl From<CompiledModule> for Module {
    fn from(module: CompiledModule) -> Self {
        Self::Compiled(module)
    }
}

impl From<OtherModule> for Module {
    fn from(module: OtherModule) -> Self {
        Self::Other(module)
    }
}

/// Queries a generation pass needs from a resolved build graph.
pub trait BuildGraph {
    /// All modules, in visiting order.
    fn modules(&self) -> &[Module];

    /// Macro context that raw flags are evaluated against.
    fn evaluator(&self) -> &dyn MacroEvaluator;

    /// Root source directory of the build.
    ///
    /// May be relative; callers make it absolute.
    fn source_root(&self) -> Result<PathBuf>;
}
